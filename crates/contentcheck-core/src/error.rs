//! Error types for the contentcheck core library
//!
//! Validation failures (missing values, pattern mismatches, editor rules,
//! undecodable composite payloads) are data and live in
//! [`crate::validation::ValidationFailure`]. The [`Error`] type here is
//! reserved for contract violations: type metadata that cannot be resolved
//! or is internally inconsistent, plus I/O and parsing faults raised while
//! loading metadata documents.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Main error type for contentcheck operations
#[derive(Error, Debug)]
pub enum Error {
    /// A content item or sub-item references a content type that does not exist
    #[error("Content type not found: {alias}")]
    ContentTypeNotFound { alias: String },

    /// A property alias is not declared on its content type
    #[error("Property type '{property}' not found on content type '{content_type}'")]
    PropertyTypeNotFound {
        content_type: String,
        property: String,
    },

    /// A property type references a data type id that does not exist
    #[error("Data type not found: {id}")]
    DataTypeNotFound { id: i32 },

    /// A property type carries a pattern that does not compile
    #[error("Invalid pattern on property '{property}': {message}")]
    InvalidPattern {
        property: String,
        message: String,
        #[source]
        source: regex::Error,
    },

    /// Composite nesting exceeded the configured depth
    #[error("Composite nesting exceeded maximum depth of {max_depth} at '{path}'")]
    RecursionLimit { max_depth: usize, path: String },

    /// Metadata document is structurally unusable
    #[error("Metadata error: {message}")]
    Metadata {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of a validation failure
///
/// Every kind is a data outcome; none of them aborts a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Required value is null or empty
    EmptyOrNull,
    /// Value does not match the configured pattern
    PatternMismatch,
    /// Editor-specific rule failed
    CustomRuleFailed,
    /// Composite payload is malformed or references an unknown sub-type
    DecodeError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::EmptyOrNull => write!(f, "EmptyOrNull"),
            FailureKind::PatternMismatch => write!(f, "PatternMismatch"),
            FailureKind::CustomRuleFailed => write!(f, "CustomRuleFailed"),
            FailureKind::DecodeError => write!(f, "DecodeError"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
