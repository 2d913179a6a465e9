//! Error types for schema document loading.
//!
//! Covers reading the file, parsing it as JSON or YAML, structural problems
//! in the document, and validation failures of the resulting tree.

use elegant_cli_core::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while loading a schema document.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension does not name a supported format.
    #[error("unsupported schema format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    /// The document parsed but its shape is wrong (e.g. a non-string key).
    #[error("invalid schema document: {0}")]
    InvalidDocument(String),

    /// The document describes a tree the engine refuses to build.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
