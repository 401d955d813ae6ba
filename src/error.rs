//! Error type for the aggregation engine.

use thiserror::Error;

/// Errors raised by engine operations.
///
/// Engine operations are pure, so every error is a rejected argument and is
/// returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A numeric argument is outside its domain (negative or non-finite).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument(message.into())
    }
}
