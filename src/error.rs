//! Unified error types for pipfile-diff.
//!
//! A parse failure is fatal to the whole run: a partially-parsed snapshot
//! could under-report changes, so nothing downstream ever sees one.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipfile-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipfileDiffError {
    /// Errors during lockfile parsing
    #[error("Failed to parse lockfile: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while talking to the hosting API
    #[error("Publish operation failed: {context}")]
    Publish {
        context: String,
        #[source]
        source: PublishErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON object at {0}")]
    NotAnObject(String),

    #[error("Entry '{name}' in section '{section}' has neither a version nor a VCS source")]
    MissingSpec { section: String, name: String },

    #[error("Entry '{name}' in section '{section}' has both a version and a VCS source")]
    AmbiguousSpec { section: String, name: String },

    #[error("VCS entry '{name}' in section '{section}' has no ref, branch, tag, or rev")]
    MissingVcsRef { section: String, name: String },

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Specific publish error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PublishErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Convenient Result type for pipfile-diff operations
pub type Result<T> = std::result::Result<T, PipfileDiffError>;

impl PipfileDiffError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a publish error with context
    pub fn publish(context: impl Into<String>, source: PublishErrorKind) -> Self {
        Self::Publish {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for PipfileDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PipfileDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}
