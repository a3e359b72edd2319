//! Image recipe
//!
//! An [`ImageRecipe`] is the five-step build pipeline
//! `FROM → WORKDIR → COPY → ENV → CMD`. It is validated once on
//! construction and rendered to Dockerfile text that ships inside the
//! build context archive.

use crate::config::ImageConfig;
use std::fmt;
use thiserror::Error;

/// Name of the generated Dockerfile inside the build context archive
///
/// Chosen so it cannot collide with a `Dockerfile` the application tree
/// may already carry.
pub const RECIPE_FILE_NAME: &str = ".assistant-bot.Dockerfile";

/// Recipe validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecipeError {
    #[error("base image name must not be empty or contain whitespace")]
    InvalidBaseImage,

    #[error("base image tag must not be empty or contain whitespace")]
    InvalidBaseTag,

    #[error("working directory '{0}' must be an absolute path")]
    RelativeWorkdir(String),

    #[error("environment variable name '{0}' must be non-empty without '=' or whitespace")]
    InvalidEnvKey(String),

    #[error("environment variable '{0}' value must be a single line")]
    MultilineEnvValue(String),

    #[error("entrypoint command must have at least one token")]
    EmptyCommand,
}

impl RecipeError {
    /// Config field (under `image.`) responsible for the error
    pub fn field(&self) -> &'static str {
        match self {
            RecipeError::InvalidBaseImage => "base_image",
            RecipeError::InvalidBaseTag => "base_tag",
            RecipeError::RelativeWorkdir(_) => "workdir",
            RecipeError::InvalidEnvKey(_) | RecipeError::MultilineEnvValue(_) => "env",
            RecipeError::EmptyCommand => "command",
        }
    }

    pub fn fix_hint(&self) -> &'static str {
        match self {
            RecipeError::InvalidBaseImage => "Set \"base_image\": \"python\"",
            RecipeError::InvalidBaseTag => "Set \"base_tag\": \"3.13-slim\"",
            RecipeError::RelativeWorkdir(_) => "Set \"workdir\": \"/app\"",
            RecipeError::InvalidEnvKey(_) | RecipeError::MultilineEnvValue(_) => {
                "Use entries like \"env\": {\"PYTHONUNBUFFERED\": \"1\"}"
            }
            RecipeError::EmptyCommand => "Set \"command\": [\"python\", \"main.py\"]",
        }
    }
}

/// One Dockerfile instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    From { image: String, tag: String },
    Workdir(String),
    Copy { source: String, dest: String },
    Env { key: String, value: String },
    Cmd(Vec<String>),
}

/// Quote an ENV value when the Dockerfile lexer would otherwise split or
/// expand it
fn quote_env_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Exec-form JSON array, e.g. `["python", "main.py"]`
fn exec_form(tokens: &[String]) -> String {
    let quoted: Vec<String> = tokens
        .iter()
        .map(|token| serde_json::Value::String(token.clone()).to_string())
        .collect();
    format!("[{}]", quoted.join(", "))
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::From { image, tag } => write!(f, "FROM {image}:{tag}"),
            Instruction::Workdir(path) => write!(f, "WORKDIR {path}"),
            Instruction::Copy { source, dest } => write!(f, "COPY {source} {dest}"),
            Instruction::Env { key, value } => write!(f, "ENV {key}={}", quote_env_value(value)),
            Instruction::Cmd(tokens) => write!(f, "CMD {}", exec_form(tokens)),
        }
    }
}

/// A validated image recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecipe {
    base_image: String,
    base_tag: String,
    workdir: String,
    env: Vec<(String, String)>,
    command: Vec<String>,
}

fn is_token(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

impl ImageRecipe {
    pub fn new(
        base_image: &str,
        base_tag: &str,
        workdir: &str,
        env: Vec<(String, String)>,
        command: Vec<String>,
    ) -> Result<Self, RecipeError> {
        if !is_token(base_image) {
            return Err(RecipeError::InvalidBaseImage);
        }
        if !is_token(base_tag) {
            return Err(RecipeError::InvalidBaseTag);
        }
        if !workdir.starts_with('/') || workdir.chars().any(char::is_whitespace) {
            return Err(RecipeError::RelativeWorkdir(workdir.to_string()));
        }
        for (key, value) in &env {
            if !is_token(key) || key.contains('=') {
                return Err(RecipeError::InvalidEnvKey(key.clone()));
            }
            if value.contains(['\n', '\r']) {
                return Err(RecipeError::MultilineEnvValue(key.clone()));
            }
        }
        if command.is_empty() {
            return Err(RecipeError::EmptyCommand);
        }

        Ok(Self {
            base_image: base_image.to_string(),
            base_tag: base_tag.to_string(),
            workdir: workdir.to_string(),
            env,
            command,
        })
    }

    pub fn from_config(config: &ImageConfig) -> Result<Self, RecipeError> {
        Self::new(
            &config.base_image,
            &config.base_tag,
            &config.workdir,
            config
                .env
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            config.command.clone(),
        )
    }

    /// `name:tag` of the base runtime image
    pub fn base_ref(&self) -> String {
        format!("{}:{}", self.base_image, self.base_tag)
    }

    pub fn base_image(&self) -> &str {
        &self.base_image
    }

    pub fn base_tag(&self) -> &str {
        &self.base_tag
    }

    pub fn workdir(&self) -> &str {
        &self.workdir
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Instructions in pipeline order
    pub fn instructions(&self) -> Vec<Instruction> {
        let mut steps = vec![
            Instruction::From {
                image: self.base_image.clone(),
                tag: self.base_tag.clone(),
            },
            Instruction::Workdir(self.workdir.clone()),
            Instruction::Copy {
                source: ".".to_string(),
                dest: self.workdir.clone(),
            },
        ];
        steps.extend(self.env.iter().map(|(key, value)| Instruction::Env {
            key: key.clone(),
            value: value.clone(),
        }));
        steps.push(Instruction::Cmd(self.command.clone()));
        steps
    }

    /// Dockerfile text
    pub fn render(&self) -> String {
        let mut text = String::from("# Generated by assistant-bot\n");
        for instruction in self.instructions() {
            text.push_str(&instruction.to_string());
            text.push('\n');
        }
        text
    }
}
