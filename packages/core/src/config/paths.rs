//! Platform-specific paths for configuration and data
//!
//! Uses `directories` to resolve XDG-style locations. Environment variables
//! take precedence so containers and tests can pin paths explicitly.

use crate::store::BOOK_FILE_NAME;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "ASSISTANT_BOT_CONFIG";

/// Overrides the address book location
pub const BOOK_PATH_ENV: &str = "ASSISTANT_BOT_BOOK";

const CONFIG_FILE_NAME: &str = "config.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "assistant-bot")
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Directory holding `config.json`
pub fn get_config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Full path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    env_path(CONFIG_PATH_ENV).or_else(|| get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)))
}

/// Directory holding persistent data (the address book)
pub fn get_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default address book path when the config does not set one
pub fn get_default_book_path() -> Option<PathBuf> {
    env_path(BOOK_PATH_ENV).or_else(|| get_data_dir().map(|dir| dir.join(BOOK_FILE_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_file_name() {
        if std::env::var_os(CONFIG_PATH_ENV).is_some() {
            return;
        }
        if let Some(path) = get_config_path() {
            assert!(path.ends_with("config.json"));
        }
    }

    #[test]
    fn default_book_path_ends_with_book_file() {
        if std::env::var_os(BOOK_PATH_ENV).is_some() {
            return;
        }
        if let Some(path) = get_default_book_path() {
            assert!(path.ends_with(BOOK_FILE_NAME));
        }
    }
}
