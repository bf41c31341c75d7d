use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

/// Error types for loading and persisting cortex state.
///
/// Covers the configuration file and the on-disk model list. Errors raised by
/// the wizard, the usecases and the dispatcher have their own enums.
#[derive(Error, Debug)]
pub enum CortexError {
    /// Configuration validation error
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error (for compatibility)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// A dotted configuration path does not resolve
    #[error("invalid config path: {0}")]
    InvalidPath(String),

    /// JSON parsing error for the model list
    #[error("failed to parse model list at '{path}': {details}")]
    ModelListParse {
        /// Path of the model list file
        path: PathBuf,
        /// Parse error details
        details: String,
    },
}

/// A specialized `Result` type for cortex operations.
pub type Result<T> = result::Result<T, CortexError>;

impl CortexError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        CortexError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Wraps an I/O failure with the path it happened on.
    pub fn io_at(error: impl fmt::Display, path: &Path) -> Self {
        CortexError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
