use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KadroError>;

/// A single field-level problem in a move payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum KadroError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid id format: {0}")]
    InvalidId(String),

    #[error("Invalid move payload: {}", join_field_errors(.0))]
    InvalidPayload(Vec<FieldError>),

    #[error("Move already in flight for card {0}")]
    MoveInFlight(String),

    #[error("No drag in progress")]
    NoActiveDrag,

    #[error("Drag already in progress for card {0}")]
    DragInProgress(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "sqlite-store")]
impl From<rusqlite::Error> for KadroError {
    fn from(err: rusqlite::Error) -> Self {
        KadroError::Persistence(err.to_string())
    }
}
