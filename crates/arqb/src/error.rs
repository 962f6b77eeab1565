//! Error types for arqb

use thiserror::Error;

/// Result type alias for arqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for building and dispatching queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// A constructor or mutator was called with an argument it cannot accept.
    ///
    /// Raised eagerly at the point of misuse, never at compile time.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A terminal operation was called on a builder with no model bound.
    #[error("Model not specified for `{0}`")]
    MissingModel(&'static str),

    /// A compiled request could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failure reported by the execution layer.
    #[error("Execution error: {0}")]
    Execution(String),
}

impl QbError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a missing model error
    pub fn is_missing_model(&self) -> bool {
        matches!(self, Self::MissingModel(_))
    }
}
