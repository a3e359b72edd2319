//! Config path subcommand

use anyhow::{Result, anyhow};
use assistant_bot_core::{Config, config};

/// Print where the config file and address book live
pub fn cmd_config_path(config: &Config) -> Result<()> {
    let config_path = config::paths::get_config_path()
        .ok_or_else(|| anyhow!("Could not determine config path"))?;
    let book_path = config
        .resolved_book_path()
        .ok_or_else(|| anyhow!("Could not determine address book path"))?;

    println!("config: {}", config_path.display());
    println!("book: {}", book_path.display());
    Ok(())
}
