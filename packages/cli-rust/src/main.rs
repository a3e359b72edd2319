//! assistant-bot CLI binary
//!
//! Starts the interactive assistant by default; subcommands manage the
//! container image and configuration.

fn main() -> anyhow::Result<()> {
    assistant_bot::run()
}
