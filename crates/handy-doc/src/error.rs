//! Error types for document access, mutation and conversion.

use thiserror::Error;

/// Errors that can occur while reading, mutating or converting documents.
#[derive(Error, Debug)]
pub enum DocError {
    /// A required (`name!`) accessor found no value and no default.
    #[error("value missing: \"{key}\"")]
    ValueMissing { key: String },

    /// A mutation was attempted on a frozen document.
    #[error("can't modify frozen document (key \"{key}\")")]
    Frozen { key: String },

    /// The access shape does not name a data key (assignment-like names,
    /// more than one argument, or a receiver that is not a document).
    #[error("undefined accessor `{name}`: {reason}")]
    NoMethod { name: String, reason: String },

    /// A non-object value was given where a document is required.
    #[error("expected a mapping, found {found}")]
    NotAMapping { found: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocError {
    pub(crate) fn no_method(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DocError::NoMethod {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout handy-doc.
pub type Result<T> = std::result::Result<T, DocError>;
