//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Required field missing or empty
    #[error("missing required config field '{field}'")]
    MissingField {
        /// Dotted field path (e.g. "gcp.project")
        field: &'static str,
    },

    /// Field value out of range or malformed
    #[error("invalid config field '{field}': {message}")]
    InvalidValue {
        /// Dotted field path
        field: &'static str,
        /// What's wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create a MissingField error
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an InvalidValue error
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
