// src/error.rs

//! Error types for the packaging pipeline
//!
//! Every variant is fatal to the run that raised it. The CLI layer wraps
//! these in `anyhow` with additional context before reporting.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A configuration key was read without a default and is absent
    #[error("missing configuration key: {0}")]
    MissingKey(String),

    /// A configuration key holds the wrong kind of value
    #[error("configuration key '{key}' must be {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// A required value is missing or still set to its template placeholder
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    /// The target archive already exists and neither force nor overwrite is set
    #[error("{message}")]
    PackageVersionExists { path: PathBuf, message: String },

    /// A copy definition points at something that is neither file nor directory
    #[error("copy source does not exist: {0}")]
    InvalidCopySpec(String),

    /// A filesystem or external process operation reported failure
    #[error("{operation} failed: {detail}")]
    ExternalOperation { operation: String, detail: String },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("path traversal rejected: {0}")]
    PathTraversal(String),

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an `ExternalOperation` error
    pub fn external(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ExternalOperation {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Build a `TypeMismatch` error for `key`
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
        }
    }
}
