//! Axum router for the MCP HTTP/SSE transport.
//! Routes: `POST /sse` (requests), `GET /health` (liveness), `GET /` (server info).

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use futures_util::stream::{self, Stream};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

use bqmcp_mcp::McpHandler;
use bqmcp_protocol::error_codes;

const SERVICE_NAME: &str = "BigQuery MCP Server";
const PROTOCOL: &str = "MCP over SSE";

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP request dispatcher.
    pub handler: Arc<McpHandler>,
    /// Project reported by `/health` and `/`.
    pub project_id: String,
}

/// Builds the axum `Router` with all routes, permissive CORS and
/// request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/sse", post(handle_sse))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "BigQuery MCP Server with SSE",
        "project": state.project_id,
        "protocol": PROTOCOL,
    }))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": PROTOCOL,
        "project": state.project_id,
        "endpoints": {
            "health": "/health",
            "sse": "/sse",
            "tools": "Use MCP client to connect via SSE",
        },
        "usage": "Connect using MCP Client with SSE transport",
    }))
}

/// Answers one request with exactly one `data:` frame, then ends the stream.
async fn handle_sse(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let payload = sse_payload(&state.handler, &body).await;
    let data = match serde_json::to_string(&payload) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to serialize SSE payload");
            sse_error(&e.to_string()).to_string()
        }
    };
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(single_frame(data)),
    )
}

async fn sse_payload(handler: &McpHandler, body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return json!({"type": "connected"});
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(raw) => match serde_json::to_value(handler.handle_value(raw).await) {
            Ok(v) => v,
            Err(e) => sse_error(&e.to_string()),
        },
        Err(e) => {
            warn!(error = %e, "SSE body is not JSON");
            sse_error(&e.to_string())
        }
    }
}

fn sse_error(reason: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": null,
        "error": {
            "code": error_codes::INTERNAL_ERROR,
            "message": format!("Errore del server SSE: {reason}"),
        }
    })
}

fn single_frame(data: String) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::once(async move { Ok(Event::default().data(data)) })
}
