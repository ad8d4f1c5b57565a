//! Errors reported by warehouse adapters.

use thiserror::Error;

/// Errors returned by `Warehouse` implementations.
///
/// Retryable and permanent faults are not distinguished.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// The dataset, table or job does not exist.
    #[error("not found: {resource}")]
    NotFound { resource: String },
    /// The warehouse API rejected the request.
    #[error("{status}: {message}")]
    Api { status: u16, message: String },
    /// No usable credentials or token.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body could not be understood.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The request could not be built (bad identifier, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl WarehouseError {
    /// Returns true for missing datasets, tables or jobs.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
