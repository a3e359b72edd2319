//! Image subcommand implementations
//!
//! Provides `assistant-bot image` subcommands for rendering, building,
//! running and inspecting the container image.

mod build;
mod dockerfile;
mod inspect;
mod run;

use crate::output::format_docker_error_anyhow;
use anyhow::{Result, anyhow};
use assistant_bot_core::config::{
    display_validation_error, display_validation_warning, validate_config,
};
use assistant_bot_core::docker::{DockerClient, ImageRecipe};
use assistant_bot_core::{Config, ImageConfig};
use clap::{Args, Subcommand};

pub use build::{BuildArgs, cmd_image_build};
pub use dockerfile::cmd_image_dockerfile;
pub use inspect::{InspectArgs, cmd_image_inspect};
pub use run::{RunArgs, cmd_image_run};

/// Image command arguments
#[derive(Args)]
pub struct ImageArgs {
    #[command(subcommand)]
    command: ImageSubcommands,
}

/// Image management subcommands
#[derive(Subcommand)]
pub enum ImageSubcommands {
    /// Print the Dockerfile generated from the configured recipe
    Dockerfile,
    /// Build the image from a context directory
    Build(BuildArgs),
    /// Run the image's default command and wait for it to exit
    Run(RunArgs),
    /// Show the working directory, environment and command of a built image
    Inspect(InspectArgs),
}

/// Handle image command
///
/// Returns the exit status to propagate; only `run` can make it non-zero.
pub async fn cmd_image(args: ImageArgs, config: &Config, quiet: bool, verbose: u8) -> Result<i64> {
    match args.command {
        ImageSubcommands::Dockerfile => cmd_image_dockerfile(config, quiet).map(|()| 0),
        ImageSubcommands::Build(build_args) => {
            cmd_image_build(&build_args, config, quiet, verbose)
                .await
                .map(|()| 0)
        }
        ImageSubcommands::Run(run_args) => cmd_image_run(&run_args, config, quiet).await,
        ImageSubcommands::Inspect(inspect_args) => {
            cmd_image_inspect(&inspect_args, config, quiet)
                .await
                .map(|()| 0)
        }
    }
}

/// Validate the config and build the recipe from it
///
/// Warnings are printed unless `quiet`; a fatal problem is printed with its
/// fix hint and returned as an error.
pub(crate) fn load_recipe(config: &Config, quiet: bool) -> Result<ImageRecipe> {
    match validate_config(config) {
        Ok(warnings) => {
            if !quiet {
                for warning in &warnings {
                    display_validation_warning(warning);
                }
            }
        }
        Err(error) => {
            display_validation_error(&error);
            return Err(anyhow!("Invalid configuration: {}", error.message));
        }
    }
    Ok(ImageRecipe::from_config(&config.image)?)
}

/// `name:tag` for the configured image, with an optional tag override
pub(crate) fn image_ref(image: &ImageConfig, tag: Option<&str>) -> String {
    format!("{}:{}", image.name, tag.unwrap_or(&image.tag))
}

/// Connect to the local Docker daemon with actionable errors
pub(crate) async fn connect_docker() -> Result<DockerClient> {
    DockerClient::connect()
        .await
        .map_err(|e| format_docker_error_anyhow(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ref_uses_config_tag_by_default() {
        let image = ImageConfig::default();
        assert_eq!(image_ref(&image, None), "assistant-bot:latest");
        assert_eq!(image_ref(&image, Some("v2")), "assistant-bot:v2");
    }

    #[test]
    fn load_recipe_rejects_invalid_config() {
        let mut config = Config::default();
        config.image.command.clear();
        assert!(load_recipe(&config, true).is_err());
    }

    #[test]
    fn load_recipe_accepts_defaults() {
        let recipe = load_recipe(&Config::default(), true).unwrap();
        assert_eq!(recipe.workdir(), "/app");
    }
}
