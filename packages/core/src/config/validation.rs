//! Configuration validation with actionable error messages
//!
//! Validates the configuration and tells the user which field to edit.

use super::schema::Config;
use crate::docker::ImageRecipe;
use console::style;

/// Largest accepted `upcoming_days` window
pub const MAX_UPCOMING_DAYS: u32 = 366;

/// A configuration validation error with an actionable fix
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The config field that has an error
    pub field: String,
    /// Description of what's wrong
    pub message: String,
    /// How to fix it
    pub fix_hint: String,
}

/// A configuration validation warning (non-fatal)
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The config field with a potential issue
    pub field: String,
    /// Description of the warning
    pub message: String,
    /// Suggested change
    pub fix_hint: String,
}

/// Validate configuration and return warnings or first error
///
/// Returns Ok(warnings) if validation passes (possibly with non-fatal warnings).
/// Returns Err(error) on the first fatal validation error encountered.
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>, ValidationError> {
    let mut warnings = Vec::new();

    if config.upcoming_days > MAX_UPCOMING_DAYS {
        return Err(ValidationError {
            field: "upcoming_days".to_string(),
            message: format!("upcoming_days must be <= {MAX_UPCOMING_DAYS}"),
            fix_hint: "Set \"upcoming_days\": 7".to_string(),
        });
    }

    if let Err(e) = ImageRecipe::from_config(&config.image) {
        return Err(ValidationError {
            field: format!("image.{}", e.field()),
            message: e.to_string(),
            fix_hint: e.fix_hint().to_string(),
        });
    }

    // Warnings (non-fatal)

    if config.image.base_tag == "latest" {
        warnings.push(ValidationWarning {
            field: "image.base_tag".to_string(),
            message: "Floating 'latest' base tag makes rebuilds non-reproducible".to_string(),
            fix_hint: "Pin a version, e.g. \"base_tag\": \"3.13-slim\"".to_string(),
        });
    }

    if config.upcoming_days == 0 {
        warnings.push(ValidationWarning {
            field: "upcoming_days".to_string(),
            message: "Only birthdays falling today will be listed".to_string(),
            fix_hint: "Set \"upcoming_days\": 7".to_string(),
        });
    }

    Ok(warnings)
}

/// Display a validation error with styled formatting
pub fn display_validation_error(error: &ValidationError) {
    eprintln!();
    eprintln!("{}", style("Error: Configuration error").red().bold());
    eprintln!();
    eprintln!("  {}  {}", style("Field:").dim(), error.field);
    eprintln!("  {}  {}", style("Problem:").dim(), error.message);
    eprintln!();
    eprintln!("{}:", style("To fix").dim());
    eprintln!("  {}", style(&error.fix_hint).cyan());
    eprintln!();
}

/// Display a validation warning with styled formatting
pub fn display_validation_warning(warning: &ValidationWarning) {
    eprintln!();
    eprintln!(
        "{}",
        style("Warning: Configuration warning").yellow().bold()
    );
    eprintln!();
    eprintln!("  {}  {}", style("Field:").dim(), warning.field);
    eprintln!("  {}  {}", style("Issue:").dim(), warning.message);
    eprintln!();
    eprintln!("{}:", style("To address").dim());
    eprintln!("  {}", style(&warning.fix_hint).cyan());
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;

    #[test]
    fn test_valid_config_passes() {
        let config = Config::default();
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_upcoming_days_too_large() {
        let config = Config {
            upcoming_days: 1000,
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.field, "upcoming_days");
    }

    #[test]
    fn test_relative_workdir_rejected() {
        let config = Config {
            image: ImageConfig {
                workdir: "app".to_string(),
                ..ImageConfig::default()
            },
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.field, "image.workdir");
        assert!(err.message.contains("absolute"));
    }

    #[test]
    fn test_empty_command_rejected() {
        let config = Config {
            image: ImageConfig {
                command: Vec::new(),
                ..ImageConfig::default()
            },
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.field, "image.command");
    }

    #[test]
    fn test_latest_base_tag_warning() {
        let config = Config {
            image: ImageConfig {
                base_tag: "latest".to_string(),
                ..ImageConfig::default()
            },
            ..Config::default()
        };
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.field == "image.base_tag"));
    }

    #[test]
    fn test_zero_window_warning() {
        let config = Config {
            upcoming_days: 0,
            ..Config::default()
        };
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.field == "upcoming_days"));
    }
}
