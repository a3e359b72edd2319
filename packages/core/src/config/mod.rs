//! Configuration management
//!
//! Loads, saves, and validates `config.json`. A missing file yields the
//! defaults; a malformed file is an error rather than being replaced.

pub mod paths;
pub mod schema;
pub mod validation;

pub use schema::{Config, ImageConfig};
pub use validation::{
    ValidationError, ValidationWarning, display_validation_error, display_validation_warning,
    validate_config,
};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config path (is HOME set?)")]
    NoConfigPath,

    #[error("Failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write config {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load config from `path`, returning defaults when it does not exist
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from the platform location, or defaults if absent
pub fn load_config_or_default() -> Result<Config, ConfigError> {
    let path = paths::get_config_path().ok_or(ConfigError::NoConfigPath)?;
    load_config_from(&path)
}

/// Write config as pretty JSON to `path`, creating parent directories
pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(write_err)?;
    debug!("Saved config to {}", path.display());
    Ok(())
}

/// Write config to the platform location
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let path = paths::get_config_path().ok_or(ConfigError::NoConfigPath)?;
    save_config_to(config, &path)
}
