use thiserror::Error;

use crate::types::FieldErrors;

#[derive(Debug, Error)]
pub enum SroiError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SroiError {
    fn from(e: serde_json::Error) -> Self {
        SroiError::SerializationError(e.to_string())
    }
}
