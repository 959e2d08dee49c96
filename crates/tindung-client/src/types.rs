//! Response envelopes for the tindung client.

use serde::Deserialize;

/// Success envelope returned by every API endpoint except `/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable result.
    pub message: String,
    /// Payload.
    pub data: T,
}

/// Count payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CountResponse {
    /// Number of matching records.
    pub count: usize,
}

/// Health check payload.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    /// "ok" when the service is up.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Date the service treats as today.
    pub today: String,
}

/// Error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
