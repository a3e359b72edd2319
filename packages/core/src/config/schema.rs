//! Configuration schema for assistant-bot
//!
//! Defines the structure and defaults for the config.json file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for assistant-bot
///
/// Serialized to/from `~/.config/assistant-bot/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Address book location (default: platform data dir)
    #[serde(default)]
    pub book_path: Option<PathBuf>,

    /// Days ahead that `birthdays` looks (default: 7)
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,

    /// Container image recipe
    #[serde(default)]
    pub image: ImageConfig,
}

/// Image recipe settings
///
/// Defaults describe a slim Python runtime that copies the build context to
/// `/app`, disables output buffering, and runs `python main.py`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Repository name of the built image
    #[serde(default = "default_image_name")]
    pub name: String,

    /// Tag of the built image
    #[serde(default = "default_image_tag")]
    pub tag: String,

    /// Base runtime image name
    #[serde(default = "default_base_image")]
    pub base_image: String,

    /// Base runtime image tag
    #[serde(default = "default_base_tag")]
    pub base_tag: String,

    /// Absolute working directory inside the image
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Process environment baked into the image, in declaration order
    #[serde(default = "default_env")]
    pub env: IndexMap<String, String>,

    /// Entrypoint tokens (interpreter followed by its arguments)
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Build context directory (default: current directory)
    #[serde(default)]
    pub context: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

fn default_upcoming_days() -> u32 {
    crate::book::DEFAULT_UPCOMING_DAYS
}

fn default_image_name() -> String {
    "assistant-bot".to_string()
}

fn default_image_tag() -> String {
    "latest".to_string()
}

fn default_base_image() -> String {
    "python".to_string()
}

fn default_base_tag() -> String {
    "3.13-slim".to_string()
}

fn default_workdir() -> String {
    "/app".to_string()
}

fn default_env() -> IndexMap<String, String> {
    IndexMap::from([("PYTHONUNBUFFERED".to_string(), "1".to_string())])
}

fn default_command() -> Vec<String> {
    vec!["python".to_string(), "main.py".to_string()]
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            name: default_image_name(),
            tag: default_image_tag(),
            base_image: default_base_image(),
            base_tag: default_base_tag(),
            workdir: default_workdir(),
            env: default_env(),
            command: default_command(),
            context: None,
        }
    }
}

impl ImageConfig {
    /// `name:tag` of the image this recipe builds
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.name, self.tag)
    }

    /// `name:tag` of the base runtime image
    pub fn base_ref(&self) -> String {
        format!("{}:{}", self.base_image, self.base_tag)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            book_path: None,
            upcoming_days: default_upcoming_days(),
            image: ImageConfig::default(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved address book path
    ///
    /// `ASSISTANT_BOT_BOOK` wins over the config value, which wins over the
    /// platform default.
    pub fn resolved_book_path(&self) -> Option<PathBuf> {
        let from_env = std::env::var_os(super::paths::BOOK_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        from_env
            .or_else(|| self.book_path.clone())
            .or_else(super::paths::get_default_book_path)
    }
}
