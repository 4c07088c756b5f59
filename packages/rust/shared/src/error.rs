//! Error types for faqkit.
//!
//! Library crates use [`FaqkitError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all faqkit operations.
#[derive(Debug, thiserror::Error)]
pub enum FaqkitError {
    /// Configuration loading or validation error. Fatal at startup.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The front-matter block of a document could not be parsed.
    #[error("front-matter error in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    /// A schema file exists but is not a usable schema.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// JSON serialization of an output artifact failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FaqkitError>;

impl FaqkitError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a front-matter error for the given file.
    pub fn front_matter(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::FrontMatter {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a schema error from any displayable message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
