//! API handlers.

use serde::{Deserialize, Serialize};

pub mod health;
pub mod history;
pub mod loans;

/// Success envelope wrapping every non-error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`; errors use the error envelope instead.
    pub success: bool,
    /// Human-readable result.
    pub message: String,
    /// Payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Records to skip (default: 0).
    #[serde(default)]
    pub skip: usize,
    /// Maximum records to return (default and cap from configuration).
    pub limit: Option<usize>,
}

/// Count response payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of matching records.
    pub count: usize,
}
