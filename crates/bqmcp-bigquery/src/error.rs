//! Adapter-specific error types.

use bqmcp_warehouse::WarehouseError;
use thiserror::Error;

/// Errors from the BigQuery REST adapter.
#[derive(Debug, Error)]
pub enum BigQueryError {
    /// Credentials could not be loaded or a token could not be minted.
    #[error("authentication error: {0}")]
    Auth(String),
    /// HTTP-level failure (connect, TLS, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// BigQuery answered 404.
    #[error("not found: {message}")]
    NotFound { message: String },
    /// BigQuery answered with another non-success status.
    #[error("BigQuery API error {status}: {message}")]
    Api { status: u16, message: String },
    /// A success response did not match the expected shape.
    #[error("cannot decode BigQuery response: {0}")]
    Decode(String),
    /// The API base URL cannot carry path segments.
    #[error("invalid API base URL '{0}'")]
    InvalidUrl(String),
}

impl From<BigQueryError> for WarehouseError {
    fn from(e: BigQueryError) -> Self {
        match e {
            BigQueryError::Auth(msg) => WarehouseError::Auth(msg),
            BigQueryError::Http(err) => WarehouseError::Transport(err.to_string()),
            BigQueryError::NotFound { message } => WarehouseError::NotFound { resource: message },
            BigQueryError::Api { status, message } => WarehouseError::Api { status, message },
            BigQueryError::Decode(msg) => WarehouseError::Decode(msg),
            BigQueryError::InvalidUrl(url) => {
                WarehouseError::InvalidRequest(format!("invalid API base URL '{url}'"))
            }
        }
    }
}
