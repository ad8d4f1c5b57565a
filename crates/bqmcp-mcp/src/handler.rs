//! MCP request handler: routes JSON-RPC methods to their dispatch
//! functions and shapes the response envelope.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use bqmcp_protocol::{
    error_codes, methods, JsonRpcErrorResponse, JsonRpcRequest, JsonRpcResponse, RequestId,
};

use crate::dispatch;
use crate::tools::{ToolError, ToolExecutor};

/// Either a success or an error response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcOutput {
    /// Successful response.
    Success(JsonRpcResponse),
    /// Error response.
    Error(JsonRpcErrorResponse),
}

impl JsonRpcOutput {
    /// Serializes the output to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Request ID echoed by this output.
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Success(r) => r.id.as_ref(),
            Self::Error(e) => e.id.as_ref(),
        }
    }

    /// Returns true for error responses.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Faults that turn a request into a JSON-RPC error response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler for this method.
    #[error("Metodo non trovato: {0}")]
    MethodNotFound(String),
    /// The body is not a usable request object.
    #[error("richiesta non valida: {0}")]
    InvalidRequest(String),
    /// `tools/call` params are missing or malformed.
    #[error("parametri non validi per tools/call: {0}")]
    InvalidParams(String),
    /// The executor rejected the call.
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// The result could not be serialized.
    #[error("serializzazione fallita: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DispatchError {
    /// JSON-RPC error code for this fault.
    pub fn code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    /// Message sent to the client.
    pub fn client_message(&self) -> String {
        match self {
            Self::MethodNotFound(_) => self.to_string(),
            _ => format!("Errore interno del server: {self}"),
        }
    }
}

/// Name reported for a request that carries no `method`.
const MISSING_METHOD: &str = "None";

/// Routes MCP requests to the tool executor.
///
/// Holds no per-request state; one instance serves every connection.
pub struct McpHandler {
    executor: ToolExecutor,
}

impl McpHandler {
    /// Creates a handler backed by `executor`.
    pub fn new(executor: ToolExecutor) -> Self {
        Self { executor }
    }

    /// Handles one raw JSON value as a request.
    ///
    /// Values that are not request objects produce an internal error
    /// response that echoes `id` when it can be recovered.
    pub async fn handle_value(&self, raw: Value) -> JsonRpcOutput {
        match serde_json::from_value::<JsonRpcRequest>(raw.clone()) {
            Ok(request) => self.dispatch(&request).await,
            Err(e) => {
                let id = RequestId::from_raw(&raw);
                warn!(error = %e, ?id, "malformed JSON-RPC request");
                error_output(id, DispatchError::InvalidRequest(e.to_string()))
            }
        }
    }

    /// Dispatches a parsed request to the matching method.
    pub async fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcOutput {
        let id = request.id.clone();
        let method = request.method.as_deref().unwrap_or(MISSING_METHOD);
        info!(method, ?id, "dispatching request");

        let outcome = match method {
            methods::INITIALIZE => dispatch::initialize::handle_initialize(),
            methods::TOOLS_LIST => dispatch::tools_list::handle_tools_list(),
            methods::TOOLS_CALL => {
                dispatch::tools_call::handle_tools_call(request.params.as_ref(), &self.executor)
                    .await
            }
            other => Err(DispatchError::MethodNotFound(other.to_string())),
        };

        match outcome {
            Ok(result) => JsonRpcOutput::Success(JsonRpcResponse::success(id, result)),
            Err(e) => {
                match &e {
                    DispatchError::MethodNotFound(_) => warn!(error = %e, "unknown method"),
                    _ => error!(method, error = %e, "dispatch failed"),
                }
                error_output(id, e)
            }
        }
    }
}

fn error_output(id: Option<RequestId>, err: DispatchError) -> JsonRpcOutput {
    JsonRpcOutput::Error(JsonRpcErrorResponse::error(
        id,
        err.code(),
        err.client_message(),
    ))
}
