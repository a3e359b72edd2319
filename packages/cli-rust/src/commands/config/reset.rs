//! Config reset subcommand
//!
//! Resets configuration to default values. The address book is untouched.

use anyhow::Result;
use assistant_bot_core::{Config, save_config};
use console::style;
use dialoguer::Confirm;

/// Reset configuration to defaults
///
/// Prompts for confirmation unless --force is specified.
pub fn cmd_config_reset(force: bool, quiet: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults? Contacts are kept.")
            .default(false)
            .interact()?;

        if !confirmed {
            if !quiet {
                println!("Reset cancelled.");
            }
            return Ok(());
        }
    }

    save_config(&Config::default())?;

    if !quiet {
        println!(
            "{} Configuration reset to defaults",
            style("Success:").green().bold()
        );
    }

    Ok(())
}
