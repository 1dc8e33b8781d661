//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No specialists available for the requested panel")]
    NoSpecialistsAvailable,

    #[error("No specialist produced a successful response")]
    NoSuccessfulResponses,

    #[error("Invalid case input: {0}")]
    InvalidCase(String),

    #[error("Unknown specialty: {0}")]
    UnknownSpecialty(String),

    #[error("Prediction set not found for consultation {0}")]
    PredictionSetNotFound(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
