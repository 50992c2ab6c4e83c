//! Error types for xsd-semantic
//!
//! Fatal conditions only. Unresolved type references and unsupported HTTP
//! verbs are not errors: they degrade to best-effort output.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for conversion requests
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unparsable input document
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Low-level XML tokenizer error
    #[error("XML error: {0}")]
    Xml(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Output path could not be written
    #[error("cannot write '{}': {message}", path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Attach a source location to a parse or XML error.
    ///
    /// Other variants are returned unchanged.
    pub fn at(self, location: impl Into<String>) -> Self {
        match self {
            Error::Parse(e) => Error::Parse(e.with_location(location)),
            Error::Xml(msg) => Error::Parse(ParseError::new(msg).with_location(location)),
            other => other,
        }
    }
}

/// Document parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location of the offending document (file path, usually)
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
