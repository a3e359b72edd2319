//! Centralized Docker error formatting
//!
//! This module provides consistent, actionable error messages for Docker-related
//! errors across the image commands.

use anyhow::anyhow;
use assistant_bot_core::docker::DockerError;
use console::style;

/// Format Docker errors with actionable guidance
///
/// Returns a styled, multi-line error message with troubleshooting steps.
pub fn format_docker_error(e: &DockerError) -> String {
    match e {
        DockerError::NotRunning => {
            format!(
                "{}\n\n  {}\n  {}\n  {}",
                style("Docker is not responding").red().bold(),
                "Start or restart the Docker daemon:",
                style("  Linux:  sudo systemctl start docker").cyan(),
                style("  macOS:  open -a Docker").cyan(),
            )
        }
        DockerError::SocketNotFound => {
            format!(
                "{}\n\n  {}\n  {}\n  {}",
                style("Docker socket not found").red().bold(),
                "Docker may not be installed or the service isn't running:",
                style("  Linux:  sudo systemctl enable --now docker").cyan(),
                "Then verify the socket exists at /var/run/docker.sock, or set DOCKER_HOST.",
            )
        }
        DockerError::PermissionDenied => {
            format!(
                "{}\n\n  {}\n  {}\n\n  {}\n  {}\n  {}",
                style("Permission denied accessing Docker").red().bold(),
                "Your user likely lacks access to the Docker socket.",
                style("  Check: ls -l /var/run/docker.sock").cyan(),
                "Fix (Linux):",
                style("  sudo usermod -aG docker $USER").cyan(),
                "Then log out and back in (or run: newgrp docker).",
            )
        }
        DockerError::Connection(msg) => {
            format!(
                "{}\n\n  {}",
                style("Cannot connect to Docker").red().bold(),
                msg,
            )
        }
        DockerError::Recipe(err) => {
            format!(
                "{}\n\n  {}\n  {}",
                style("Invalid image recipe").red().bold(),
                err,
                style(format!("  Fix image.{}: {}", err.field(), err.fix_hint())).cyan(),
            )
        }
        DockerError::Context(msg) => {
            format!(
                "{}\n\n  {}\n  {}",
                style("Build context could not be read").red().bold(),
                msg,
                style("  Try: assistant-bot image build --context <DIR>").cyan(),
            )
        }
        DockerError::Pull(msg) => {
            format!(
                "{}\n\n  {}\n  {}",
                style("Base image could not be resolved").red().bold(),
                msg,
                style("  Check image.base_image and image.base_tag in your config").cyan(),
            )
        }
        DockerError::Build(msg) => {
            format!("{}\n\n{}", style("Image build failed").red().bold(), msg)
        }
        DockerError::Launch(msg) => {
            format!(
                "{}\n\n  {}\n  {}",
                style("Entrypoint could not be started").red().bold(),
                msg,
                style("  Check that image.command names a program present in the image").cyan(),
            )
        }
        _ => e.to_string(),
    }
}

/// Format Docker errors as anyhow::Error
///
/// Convenience wrapper for commands that want to return the error directly.
pub fn format_docker_error_anyhow(e: &DockerError) -> anyhow::Error {
    anyhow!("{}", format_docker_error(e))
}
