//! Error types for tindung storage.

use tindung_core::CreditError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A record with the same key already exists.
    #[error("already exists: {0}")]
    Conflict(String),

    /// Record not found.
    #[error("not found")]
    NotFound,
}

impl From<StoreError> for CreditError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(key) => Self::Conflict(format!("{key} already exists")),
            other => Self::Internal(other.to_string()),
        }
    }
}
