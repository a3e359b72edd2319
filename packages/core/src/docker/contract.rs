//! Built-image contract checks
//!
//! Reads back the working directory, environment and default command
//! recorded on an image and compares them with the recipe it was built
//! from.

use super::recipe::ImageRecipe;
use super::{DockerClient, DockerError};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Runtime configuration recorded on a built image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageContract {
    pub id: String,
    pub working_dir: String,
    /// `KEY=VALUE` entries, including those inherited from the base image
    pub env: Vec<String>,
    pub cmd: Vec<String>,
}

/// One way an image differs from its recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractMismatch {
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for ContractMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, found {}",
            self.field, self.expected, self.actual
        )
    }
}

impl ImageContract {
    /// Value of an environment variable, last definition wins
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .filter_map(|entry| entry.split_once('='))
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    /// Differences between this image and `recipe`
    ///
    /// Extra variables inherited from the base image are not mismatches.
    pub fn mismatches(&self, recipe: &ImageRecipe) -> Vec<ContractMismatch> {
        let mut found = Vec::new();

        if self.working_dir != recipe.workdir() {
            found.push(ContractMismatch {
                field: "workdir",
                expected: recipe.workdir().to_string(),
                actual: self.working_dir.clone(),
            });
        }

        for (key, value) in recipe.env() {
            let actual = self.env_value(key);
            if actual != Some(value.as_str()) {
                found.push(ContractMismatch {
                    field: "env",
                    expected: format!("{key}={value}"),
                    actual: actual
                        .map(|v| format!("{key}={v}"))
                        .unwrap_or_else(|| format!("{key} unset")),
                });
            }
        }

        if self.cmd != recipe.command() {
            found.push(ContractMismatch {
                field: "command",
                expected: format!("{:?}", recipe.command()),
                actual: format!("{:?}", self.cmd),
            });
        }

        found
    }
}

/// Inspect `image_ref` and extract its runtime contract
pub async fn inspect_contract(
    client: &DockerClient,
    image_ref: &str,
) -> Result<ImageContract, DockerError> {
    debug!("Inspecting image {}", image_ref);

    let info = client
        .inner()
        .inspect_image(image_ref)
        .await
        .map_err(|e| match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => DockerError::Image(format!(
                "Image {image_ref} not found. Build it first with 'assistant-bot image build'."
            )),
            e => DockerError::Image(format!("Failed to inspect image {image_ref}: {e}")),
        })?;

    let config = info.config.unwrap_or_default();
    Ok(ImageContract {
        id: info.id.unwrap_or_default(),
        working_dir: config.working_dir.unwrap_or_default(),
        env: config.env.unwrap_or_default(),
        cmd: config.cmd.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;

    fn recipe() -> ImageRecipe {
        ImageRecipe::from_config(&ImageConfig::default()).unwrap()
    }

    fn matching_contract() -> ImageContract {
        ImageContract {
            id: "sha256:abc".to_string(),
            working_dir: "/app".to_string(),
            env: vec![
                "PATH=/usr/local/bin:/usr/bin".to_string(),
                "PYTHONUNBUFFERED=1".to_string(),
            ],
            cmd: vec!["python".to_string(), "main.py".to_string()],
        }
    }

    #[test]
    fn matching_image_has_no_mismatches() {
        assert!(matching_contract().mismatches(&recipe()).is_empty());
    }

    #[test]
    fn env_value_uses_last_definition() {
        let mut contract = matching_contract();
        contract.env.push("PYTHONUNBUFFERED=0".to_string());
        assert_eq!(contract.env_value("PYTHONUNBUFFERED"), Some("0"));
        assert_eq!(contract.env_value("MISSING"), None);
    }

    #[test]
    fn differences_are_reported_per_field() {
        let contract = ImageContract {
            working_dir: "/".to_string(),
            env: Vec::new(),
            cmd: vec!["python3".to_string()],
            ..matching_contract()
        };
        let mismatches = contract.mismatches(&recipe());
        let fields: Vec<_> = mismatches.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec!["workdir", "env", "command"]);
        assert_eq!(mismatches[1].actual, "PYTHONUNBUFFERED unset");
        assert_eq!(
            mismatches[0].to_string(),
            "workdir: expected /app, found /"
        );
    }
}
