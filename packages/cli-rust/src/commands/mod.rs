//! CLI command implementations
//!
//! This module contains the interactive assistant, image and config commands.

mod chat;
mod config;
mod image;

pub use chat::{ChatArgs, cmd_chat};
pub use config::{ConfigArgs, cmd_config};
pub use image::{ImageArgs, cmd_image};
