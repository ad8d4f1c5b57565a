//! Integration tests for the HTTP router (`/sse`, `/health`, `/`).

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use bqmcp_mcp::{McpHandler, ToolExecutor};
use bqmcp_transport_http::{build_router, AppState};
use bqmcp_warehouse::{
    DatasetMetadata, DatasetRef, QueryRows, TableMetadata, TableSummary, Warehouse,
    WarehouseError,
};

struct EmptyWarehouse;

#[async_trait]
impl Warehouse for EmptyWarehouse {
    fn project_id(&self) -> &str {
        "router-test"
    }

    async fn run_query(&self, _sql: &str) -> Result<QueryRows, WarehouseError> {
        Ok(Vec::new())
    }

    async fn list_datasets(&self) -> Result<Vec<DatasetRef>, WarehouseError> {
        Ok(Vec::new())
    }

    async fn get_dataset(&self, dataset_id: &str) -> Result<DatasetMetadata, WarehouseError> {
        Err(WarehouseError::NotFound {
            resource: format!("Dataset router-test:{dataset_id}"),
        })
    }

    async fn list_tables(&self, _dataset_id: &str) -> Result<Vec<TableSummary>, WarehouseError> {
        Ok(Vec::new())
    }

    async fn get_table(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableMetadata, WarehouseError> {
        Err(WarehouseError::NotFound {
            resource: format!("Table router-test:{dataset_id}.{table_id}"),
        })
    }
}

fn app() -> Router {
    let executor = ToolExecutor::new(Arc::new(EmptyWarehouse));
    build_router(AppState {
        handler: Arc::new(McpHandler::new(executor)),
        project_id: "router-test".to_string(),
    })
}

async fn get_json(uri: &str) -> Value {
    let req = Request::builder().uri(uri).body(Body::empty()).expect("req");
    let resp = app().oneshot(req).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}

/// Posts `body` to `/sse` and returns the content type plus the raw stream.
async fn post_sse(body: impl Into<Body>) -> (String, String) {
    let req = Request::builder()
        .method("POST")
        .uri("/sse")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("req");
    let resp = app().oneshot(req).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("body");
    (content_type, String::from_utf8(bytes.to_vec()).expect("utf8"))
}

/// Parses the single `data:` frame of an SSE stream.
fn single_frame(stream: &str) -> Value {
    let frames: Vec<&str> = stream
        .split("\n\n")
        .filter(|f| !f.trim().is_empty())
        .collect();
    assert_eq!(frames.len(), 1, "expected one frame, got {stream:?}");
    let data = frames[0].strip_prefix("data: ").expect("data prefix");
    serde_json::from_str(data).expect("frame json")
}

#[tokio::test]
async fn health_reports_project() {
    let body = get_json("/health").await;
    assert_eq!(
        body,
        json!({
            "status": "healthy",
            "service": "BigQuery MCP Server with SSE",
            "project": "router-test",
            "protocol": "MCP over SSE"
        })
    );
}

#[tokio::test]
async fn root_lists_endpoints() {
    let body = get_json("/").await;
    assert_eq!(body["name"], "BigQuery MCP Server");
    assert_eq!(body["project"], "router-test");
    assert_eq!(body["endpoints"]["sse"], "/sse");
    assert_eq!(body["endpoints"]["health"], "/health");
    assert_eq!(body["usage"], "Connect using MCP Client with SSE transport");
}

#[tokio::test]
async fn empty_body_yields_connected_frame() {
    let (content_type, stream) = post_sse(Body::empty()).await;
    assert!(content_type.starts_with("text/event-stream"));
    assert_eq!(stream, "data: {\"type\":\"connected\"}\n\n");
}

#[tokio::test]
async fn whitespace_body_counts_as_empty() {
    let (_, stream) = post_sse(" \n\t ").await;
    assert_eq!(single_frame(&stream), json!({"type": "connected"}));
}

#[tokio::test]
async fn malformed_body_yields_sse_server_error() {
    let (_, stream) = post_sse("{not json").await;
    let frame = single_frame(&stream);
    assert_eq!(frame["jsonrpc"], "2.0");
    assert_eq!(frame["id"], Value::Null);
    assert_eq!(frame["error"]["code"], -32603);
    let message = frame["error"]["message"].as_str().expect("message");
    assert!(message.starts_with("Errore del server SSE: "));
}

#[tokio::test]
async fn tools_list_over_sse() {
    let request = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"});
    let (_, stream) = post_sse(request.to_string()).await;
    let frame = single_frame(&stream);
    assert_eq!(frame["id"], 1);
    assert_eq!(frame["result"]["tools"].as_array().expect("tools").len(), 4);
}

#[tokio::test]
async fn unknown_method_over_sse() {
    let request = json!({"jsonrpc": "2.0", "id": "abc", "method": "foo/bar"});
    let (_, stream) = post_sse(request.to_string()).await;
    let frame = single_frame(&stream);
    assert_eq!(frame["id"], "abc");
    assert_eq!(frame["error"]["code"], -32601);
}

#[tokio::test]
async fn missing_table_is_a_successful_sse_frame() {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "tools/call",
        "params": {
            "name": "describe_table",
            "arguments": {"dataset_id": "sales", "table_id": "ghost"}
        }
    });
    let (_, stream) = post_sse(request.to_string()).await;
    let frame = single_frame(&stream);
    assert!(frame.get("error").is_none());
    assert_eq!(frame["result"]["isError"], true);
    let text = frame["result"]["content"][0]["text"].as_str().expect("text");
    assert!(text.starts_with("Errore nel descrivere la tabella: "));
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/sse")
        .header(header::ORIGIN, "https://client.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("req");
    let resp = app().oneshot(req).await.expect("resp");
    assert!(resp.status().is_success());
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn get_on_sse_is_not_allowed() {
    let req = Request::builder()
        .uri("/sse")
        .body(Body::empty())
        .expect("req");
    let resp = app().oneshot(req).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
