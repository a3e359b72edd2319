//! Core library for assistant-bot
//!
//! This library provides the shared functionality for the assistant-bot CLI:
//! - Address book model with birthday reminders
//! - Command interpreter driving an interactive session
//! - JSON persistence of the address book
//! - Configuration management
//! - Container image recipe, build and launch

pub mod assistant;
pub mod book;
pub mod config;
pub mod docker;
pub mod store;

// Re-export commonly used types
pub use assistant::{Assistant, Reply, SessionError, View, run_session};
pub use book::{AddressBook, BookError, Record};
pub use config::{Config, ConfigError, ImageConfig, load_config_or_default, save_config};
pub use docker::{DockerClient, DockerError, ImageRecipe};
pub use store::{StoreError, load_book, save_book};

// Re-export bollard to ensure version consistency across crates
pub use bollard;

/// Get the version string for the CLI
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
