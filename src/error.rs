//! Error types shared by filter construction and categorization.

use thiserror::Error;

/// Errors surfaced to callers of this crate.
///
/// Nothing is retried locally: collaborator failures are handed back unchanged
/// and configuration problems are reported before any collaborator is called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SenseError {
    /// Empty input, a non-positive threshold or term count, or numerically
    /// unusable example weights
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The document index or the salience oracle failed
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),
    /// A persisted model could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl SenseError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::IndexUnavailable(msg.into())
    }
}

impl From<serde_cbor::Error> for SenseError {
    fn from(err: serde_cbor::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SenseError>;
