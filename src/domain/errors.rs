//! Domain errors for the reckon decision engine.

use thiserror::Error;

/// Domain-level errors that can occur while pursuing a goal.
///
/// None of these are raised for well-formed phase output: decoding problems
/// are folded into a failed resolution where they are detected. A
/// `DomainError` reaching the goal executor is absorbed exactly once into a
/// failed pursuit outcome.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("{phase} phase failed: {message}")]
    Phase { phase: &'static str, message: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Wrap a failure raised inside a pluggable decision phase.
    pub fn phase(phase: &'static str, message: impl Into<String>) -> Self {
        Self::Phase {
            phase,
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DomainError {
    fn from(err: serde_yaml::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
