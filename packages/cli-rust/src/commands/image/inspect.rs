//! Image inspect subcommand
//!
//! Reads back the runtime contract of a built image and checks it against
//! the configured recipe.

use super::{connect_docker, image_ref, load_recipe};
use crate::output::{format_docker_error_anyhow, short_id};
use anyhow::{Result, bail};
use assistant_bot_core::Config;
use assistant_bot_core::docker::{ContractMismatch, ImageContract, inspect_contract};
use clap::Args;
use comfy_table::{Cell, Color, Table};
use console::style;
use serde::Serialize;

/// Arguments for the image inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Tag to inspect instead of image.tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Output as JSON instead of table format
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    image: &'a str,
    matches_recipe: bool,
    contract: &'a ImageContract,
    mismatches: &'a [ContractMismatch],
}

/// Inspect the image; fails when it is missing or differs from the recipe
pub async fn cmd_image_inspect(args: &InspectArgs, config: &Config, quiet: bool) -> Result<()> {
    let recipe = load_recipe(config, quiet)?;
    let image_ref = image_ref(&config.image, args.tag.as_deref());
    let client = connect_docker().await?;

    let contract = inspect_contract(&client, &image_ref)
        .await
        .map_err(|e| format_docker_error_anyhow(&e))?;
    let mismatches = contract.mismatches(&recipe);

    if args.json {
        let report = InspectReport {
            image: &image_ref,
            matches_recipe: mismatches.is_empty(),
            contract: &contract,
            mismatches: &mismatches,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", contract_table(&image_ref, &contract, &mismatches));
        if !mismatches.is_empty() {
            println!();
            println!("{}", style("Differences from configured recipe:").yellow().bold());
            for mismatch in &mismatches {
                println!("  {mismatch}");
            }
        }
    }

    if !mismatches.is_empty() {
        bail!(
            "Image {image_ref} does not match the configured recipe. Rebuild it with 'assistant-bot image build'."
        );
    }
    Ok(())
}

fn contract_table(image_ref: &str, contract: &ImageContract, mismatches: &[ContractMismatch]) -> Table {
    let differs = |field: &str| mismatches.iter().any(|m| m.field == field);
    let value_cell = |field: &str, value: String| {
        if differs(field) {
            Cell::new(value).fg(Color::Yellow)
        } else {
            Cell::new(value)
        }
    };

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    table.add_row(vec![Cell::new("image"), Cell::new(image_ref)]);
    table.add_row(vec![Cell::new("id"), Cell::new(short_id(&contract.id))]);
    table.add_row(vec![
        Cell::new("workdir"),
        value_cell("workdir", contract.working_dir.clone()),
    ]);
    table.add_row(vec![Cell::new("env"), value_cell("env", contract.env.join("\n"))]);
    table.add_row(vec![
        Cell::new("command"),
        value_cell("command", serde_json::to_string(&contract.cmd).unwrap_or_default()),
    ]);
    table
}
