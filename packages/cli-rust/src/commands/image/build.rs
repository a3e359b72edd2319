//! Image build subcommand
//!
//! Collects the build context, resolves the base image and builds the
//! application image on the local Docker daemon.

use super::{connect_docker, image_ref, load_recipe};
use crate::output::{format_docker_error_anyhow, short_id};
use anyhow::Result;
use assistant_bot_core::Config;
use assistant_bot_core::docker::{BuildContext, BuildOptions, ProgressReporter, build_image};
use clap::Args;
use console::style;
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the image build command
#[derive(Args)]
pub struct BuildArgs {
    /// Build context directory (defaults to image.context, then the current directory)
    #[arg(long, value_name = "DIR")]
    pub context: Option<PathBuf>,

    /// Tag to build instead of image.tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Build without using cached layers
    #[arg(long)]
    pub no_cache: bool,

    /// Do not pull the base image before building
    #[arg(long)]
    pub no_pull: bool,

    /// Print raw build output instead of progress spinners
    #[arg(long)]
    pub plain: bool,
}

fn context_dir(args: &BuildArgs, config: &Config) -> PathBuf {
    args.context
        .clone()
        .or_else(|| config.image.context.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Build the application image
pub async fn cmd_image_build(
    args: &BuildArgs,
    config: &Config,
    quiet: bool,
    verbose: u8,
) -> Result<()> {
    let recipe = load_recipe(config, quiet)?;
    let image_ref = image_ref(&config.image, args.tag.as_deref());
    let dir = context_dir(args, config);

    let context = BuildContext::collect(&dir).map_err(|e| format_docker_error_anyhow(&e))?;

    if verbose > 0 {
        eprintln!(
            "{} Context: {} ({} files)",
            style("[info]").cyan(),
            context.root().display(),
            context.files().count()
        );
        eprintln!("{} Base image: {}", style("[info]").cyan(), recipe.base_ref());
    }

    let client = connect_docker().await?;
    debug!("Connected to Docker, building {}", image_ref);

    if !quiet {
        eprintln!(
            "Building {} from {}",
            style(&image_ref).cyan(),
            style(dir.display()).dim()
        );
    }

    let mut progress = if quiet {
        ProgressReporter::hidden()
    } else if args.plain {
        ProgressReporter::plain()
    } else {
        ProgressReporter::new()
    };

    let options = BuildOptions {
        no_cache: args.no_cache,
        skip_pull: args.no_pull,
    };

    let image_id = build_image(&client, &recipe, &context, &image_ref, &options, &mut progress)
        .await
        .map_err(|e| format_docker_error_anyhow(&e))?;

    if !quiet {
        println!(
            "{} Built {} ({})",
            style("Success:").green().bold(),
            style(&image_ref).cyan(),
            short_id(&image_id)
        );
    }

    Ok(())
}
