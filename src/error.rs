//! Error types for wpstack.
//!
//! Two categories matter to the caller: precondition failures (a required
//! tool is missing, nothing was written) and everything else (config,
//! randomness, filesystem). `main` maps both to exit status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// One or more required executables could not be resolved
    #[error("Required tool not found: {}", .tools.join(", "))]
    MissingTools { tools: Vec<String> },

    /// Configuration file could not be read
    #[error("Failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the schema
    #[error("Failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration parsed but violates a constraint
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The OS random source failed; there is no fallback
    #[error("Random source unavailable: {message}")]
    RandomSource { message: String },

    /// An artifact could not be rendered
    #[error("Failed to render {artifact}: {message}")]
    Render { artifact: String, message: String },

    /// The project directory (or an artifact's parent) could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be written
    #[error("Failed to write {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    /// True for failures detected before anything touched the filesystem
    /// because the host lacks a required tool.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingTools { .. })
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
