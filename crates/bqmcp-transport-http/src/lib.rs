//! HTTP/SSE transport adapter for the BigQuery MCP server.
//! Exposes MCP over `POST /sse`, plus `GET /health` and `GET /`.

mod error;
pub mod router;
pub mod server;

pub use error::HttpTransportError;
pub use router::{build_router, AppState};
pub use server::HttpServer;
