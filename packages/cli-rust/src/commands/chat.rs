//! Chat command implementation
//!
//! Runs the interactive assistant on stdin/stdout. This is what the
//! container image starts by default.

use crate::output::ConsoleView;
use anyhow::{Context, Result, anyhow};
use assistant_bot_core::{Assistant, Config, run_session};
use chrono::Local;
use clap::Args;
use console::style;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the chat command
#[derive(Args, Default)]
pub struct ChatArgs {
    /// Address book file (overrides config and ASSISTANT_BOT_BOOK)
    #[arg(long, value_name = "PATH")]
    pub book: Option<PathBuf>,
}

/// Start the interactive assistant
///
/// The address book is loaded before the first prompt and saved when the
/// session ends, whether by `exit`/`close` or end of input.
pub fn cmd_chat(args: &ChatArgs, config: &Config, verbose: u8) -> Result<()> {
    let book_path = match &args.book {
        Some(path) => path.clone(),
        None => config
            .resolved_book_path()
            .ok_or_else(|| anyhow!("Could not determine address book path (is HOME set?)"))?,
    };

    debug!("Opening address book {}", book_path.display());
    if verbose > 0 {
        eprintln!(
            "{} Address book: {}",
            style("[info]").cyan(),
            book_path.display()
        );
    }

    let mut assistant = Assistant::open(&book_path, config.upcoming_days)
        .with_context(|| format!("Failed to load address book {}", book_path.display()))?;

    let stdin = io::stdin();
    let mut view = ConsoleView::stdout();
    run_session(&mut assistant, stdin.lock(), &mut view, || {
        Local::now().date_naive()
    })
    .with_context(|| format!("Session ended abnormally ({})", book_path.display()))?;

    Ok(())
}
