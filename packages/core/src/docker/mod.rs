//! Docker operations module
//!
//! This module packages the assistant into a container image and runs it:
//! - Image recipe rendering (base → workdir → copy → env → cmd)
//! - Build context collection with `.dockerignore` support
//! - Docker client wrapper and error types
//! - Progress reporting for build and pull operations
//! - Image build, container launch and image contract inspection

mod client;
pub mod container;
pub mod context;
pub mod contract;
mod error;
pub mod image;
pub mod progress;
pub mod recipe;

// Core types
pub use client::DockerClient;
pub use error::DockerError;
pub use progress::ProgressReporter;

// Recipe and context
pub use context::{BuildContext, ContextEntry, EntryKind, IGNORE_FILE_NAME, IgnoreRules};
pub use recipe::{ImageRecipe, Instruction, RECIPE_FILE_NAME, RecipeError};

// Image operations
pub use image::{
    BuildOptions, build_image, ensure_base_image, image_exists, pull_image, split_image_ref,
};

// Container lifecycle
pub use container::{RunOutcome, run_container};

// Contract inspection
pub use contract::{ContractMismatch, ImageContract, inspect_contract};
