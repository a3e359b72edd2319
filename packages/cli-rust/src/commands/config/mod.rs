//! Config subcommand implementations
//!
//! Provides `assistant-bot config` subcommands for viewing and managing
//! configuration.

mod path;
mod reset;
mod show;

use anyhow::Result;
use assistant_bot_core::Config;
use clap::{Args, Subcommand};

pub use path::cmd_config_path;
pub use reset::cmd_config_reset;
pub use show::cmd_config_show;

/// Configuration command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

/// Configuration management subcommands
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current configuration
    Show {
        /// Output as JSON instead of table format
        #[arg(long)]
        json: bool,
    },
    /// Print the config file and address book locations
    Path,
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Handle config command
///
/// Routes to the appropriate handler based on the subcommand.
/// If no subcommand is given, defaults to Show.
pub fn cmd_config(args: ConfigArgs, config: &Config, quiet: bool) -> Result<()> {
    match args.command {
        Some(ConfigSubcommands::Show { json }) => cmd_config_show(config, json || args.json),
        Some(ConfigSubcommands::Path) => cmd_config_path(config),
        Some(ConfigSubcommands::Reset { force }) => cmd_config_reset(force, quiet),
        None => cmd_config_show(config, args.json),
    }
}
