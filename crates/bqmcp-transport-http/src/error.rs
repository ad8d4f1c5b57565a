//! Error types for the HTTP/SSE transport layer.

use thiserror::Error;

/// Errors that can occur in the HTTP transport.
#[derive(Debug, Error)]
pub enum HttpTransportError {
    /// The host/port pair is not a socket address.
    #[error("invalid listen address {addr}: {reason}")]
    InvalidAddress {
        /// The address string.
        addr: String,
        /// Why it could not be parsed.
        reason: String,
    },
    /// Failed to bind to the TCP address.
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        /// The address string.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server encountered an I/O error while serving.
    #[error("server error: {0}")]
    Serve(String),
}
