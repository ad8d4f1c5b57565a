//! HTTP server that binds an axum Router to a TCP socket.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use bqmcp_mcp::McpHandler;

use crate::error::HttpTransportError;
use crate::router::{build_router, AppState};

/// Axum-based HTTP server for the MCP SSE transport.
pub struct HttpServer {
    pub(crate) addr: SocketAddr,
    pub(crate) state: AppState,
}

impl HttpServer {
    /// Creates a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `handler` shared MCP dispatcher
    /// * `project_id` project reported by the info endpoints
    /// * `addr` socket address to listen on
    pub fn new(handler: Arc<McpHandler>, project_id: impl Into<String>, addr: SocketAddr) -> Self {
        Self {
            addr,
            state: AppState {
                handler,
                project_id: project_id.into(),
            },
        }
    }

    /// Parses `host:port` into a listen address.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` if `host` is not an IP address.
    pub fn parse_addr(host: &str, port: u16) -> Result<SocketAddr, HttpTransportError> {
        let text = if host.contains(':') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };
        text.parse()
            .map_err(|e: std::net::AddrParseError| HttpTransportError::InvalidAddress {
                addr: text.clone(),
                reason: e.to_string(),
            })
    }

    /// Address the server listens on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Starts the server and blocks until it exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run(self) -> Result<(), HttpTransportError> {
        self.run_until(std::future::pending()).await
    }

    /// Like [`run`](Self::run), but stops gracefully once `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), HttpTransportError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener =
            TcpListener::bind(self.addr)
                .await
                .map_err(|e| HttpTransportError::Bind {
                    addr: self.addr.to_string(),
                    source: e,
                })?;

        tracing::info!(
            addr = %self.addr,
            project = %self.state.project_id,
            "BigQuery MCP server ready"
        );

        let router = build_router(self.state);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| HttpTransportError::Serve(e.to_string()))?;

        Ok(())
    }
}
