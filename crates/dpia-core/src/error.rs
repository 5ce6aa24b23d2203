use thiserror::Error;

#[derive(Debug, Error)]
pub enum DpiaError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("External classification unavailable: {0}")]
    ExternalUnavailable(String),

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DpiaError {
    fn from(e: serde_json::Error) -> Self {
        DpiaError::SerializationError(e.to_string())
    }
}
