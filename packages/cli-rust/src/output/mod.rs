//! Output utilities for CLI commands
//!
//! This module provides the console view for the assistant, color
//! utilities, and actionable Docker error formatting.

pub mod colors;
pub mod errors;
pub mod view;

pub use colors::{exit_code_style, short_id};
pub use errors::format_docker_error_anyhow;
pub use view::ConsoleView;
