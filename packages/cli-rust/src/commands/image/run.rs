//! Image run subcommand
//!
//! Starts a container with the image's default command, relays its output,
//! and exits with the container's status.

use super::{connect_docker, image_ref};
use crate::output::{exit_code_style, format_docker_error_anyhow, short_id};
use anyhow::{Result, bail};
use assistant_bot_core::Config;
use assistant_bot_core::docker::{image_exists, run_container, split_image_ref};
use clap::Args;
use console::style;
use std::io;

/// Arguments for the image run command
#[derive(Args)]
pub struct RunArgs {
    /// Tag to run instead of image.tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Keep the container after it exits
    #[arg(long)]
    pub keep: bool,
}

/// Run the image and return the container's exit status
pub async fn cmd_image_run(args: &RunArgs, config: &Config, quiet: bool) -> Result<i64> {
    let image_ref = image_ref(&config.image, args.tag.as_deref());
    let client = connect_docker().await?;

    let (name, tag) = split_image_ref(&image_ref);
    if !image_exists(&client, name, tag)
        .await
        .map_err(|e| format_docker_error_anyhow(&e))?
    {
        bail!(
            "Image {image_ref} not found. Build it first with 'assistant-bot image build'."
        );
    }

    if !quiet {
        eprintln!("Running {}", style(&image_ref).cyan());
    }

    let outcome = run_container(
        &client,
        &image_ref,
        args.keep,
        &mut io::stdout(),
        &mut io::stderr(),
    )
        .await
        .map_err(|e| format_docker_error_anyhow(&e))?;

    if !quiet {
        eprintln!();
        eprintln!(
            "Container exited with status {}",
            exit_code_style(outcome.exit_code)
        );
        if outcome.kept {
            eprintln!(
                "Container kept: {}",
                style(short_id(&outcome.container_id)).dim()
            );
        }
    }

    Ok(outcome.exit_code)
}
