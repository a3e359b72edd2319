//! assistant-bot CLI - Console address book and its container image
//!
//! This module contains the CLI implementation used by the binary.

mod commands;
mod output;

use anyhow::{Result, anyhow};
use assistant_bot_core::{Config, config, get_version, load_config_or_default};
use clap::{Parser, Subcommand};
use console::style;
use std::process;
use tracing_subscriber::EnvFilter;

/// Console address book assistant
#[derive(Parser)]
#[command(name = "assistant-bot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Console address book assistant and its container image", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive assistant (default)
    Chat(commands::ChatArgs),
    /// Build, run and inspect the container image
    Image(commands::ImageArgs),
    /// Manage configuration
    Config(commands::ConfigArgs),
}

/// Default log level for a verbosity count
fn default_log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing on stderr so stdout stays free for the assistant
///
/// `RUST_LOG` overrides the level derived from `-v`/`-q`.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose, quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load config, exiting with a rich message when it is malformed
fn load_config_or_exit(verbose: u8) -> Config {
    let config_path = config::paths::get_config_path();
    let display_path = config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match load_config_or_default() {
        Ok(config) => {
            if verbose > 0 {
                eprintln!(
                    "{} Config: {}",
                    style("[info]").cyan(),
                    display_path
                );
            }
            config
        }
        Err(e) => {
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {e}");
            eprintln!();
            eprintln!("  Config file: {}", style(&display_path).yellow());
            eprintln!();
            eprintln!(
                "  {} Check the config file for syntax errors or unknown fields.",
                style("Tip:").cyan()
            );
            eprintln!(
                "  {} Run 'assistant-bot config reset' to restore defaults.",
                style("Tip:").cyan()
            );
            process::exit(1);
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose > 0 {
        eprintln!(
            "{} assistant-bot {}",
            style("[info]").cyan(),
            style(get_version()).dim()
        );
    }

    let config = load_config_or_exit(cli.verbose);

    match cli.command {
        None => commands::cmd_chat(&commands::ChatArgs::default(), &config, cli.verbose),
        Some(Commands::Chat(args)) => commands::cmd_chat(&args, &config, cli.verbose),
        Some(Commands::Config(args)) => commands::cmd_config(args, &config, cli.quiet),
        Some(Commands::Image(args)) => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| anyhow!("Failed to start async runtime: {e}"))?;
            let exit_code =
                rt.block_on(commands::cmd_image(args, &config, cli.quiet, cli.verbose))?;
            if exit_code != 0 {
                // Propagate the container's status as our own
                drop(rt);
                process::exit(exit_code_for_process(exit_code));
            }
            Ok(())
        }
    }
}

/// Clamp a container status into the range a process can exit with
fn exit_code_for_process(code: i64) -> i32 {
    i32::try_from(code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["assistant-bot"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        assert_eq!(default_log_level(0, false), "warn");
        assert_eq!(default_log_level(1, false), "info");
        assert_eq!(default_log_level(2, false), "debug");
        assert_eq!(default_log_level(5, false), "trace");
        assert_eq!(default_log_level(3, true), "error");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["assistant-bot", "image", "dockerfile", "-vv", "-q"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }

    #[test]
    fn exit_code_clamps_out_of_range_values() {
        assert_eq!(exit_code_for_process(0), 0);
        assert_eq!(exit_code_for_process(137), 137);
        assert_eq!(exit_code_for_process(i64::MAX), 1);
    }
}
