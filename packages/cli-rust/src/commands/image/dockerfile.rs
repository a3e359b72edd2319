//! Image dockerfile subcommand

use super::load_recipe;
use anyhow::Result;
use assistant_bot_core::Config;

/// Print the rendered recipe to stdout
pub fn cmd_image_dockerfile(config: &Config, quiet: bool) -> Result<()> {
    let recipe = load_recipe(config, quiet)?;
    print!("{}", recipe.render());
    Ok(())
}
