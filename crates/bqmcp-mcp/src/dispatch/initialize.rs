//! Handles the `initialize` MCP method.

use serde_json::Value;

use bqmcp_protocol::mcp::initialize::InitializeResult;

use crate::handler::DispatchError;

/// Returns the fixed server capabilities. Client params are ignored.
pub(crate) fn handle_initialize() -> Result<Value, DispatchError> {
    let result = InitializeResult::for_server(env!("CARGO_PKG_VERSION"));
    Ok(serde_json::to_value(result)?)
}
