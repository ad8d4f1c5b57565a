//! Handles the `tools/call` MCP method.

use serde_json::Value;
use tracing::debug;

use bqmcp_protocol::mcp::tools::ToolsCallParams;

use crate::handler::DispatchError;
use crate::tools::ToolExecutor;

/// Runs the named tool and wraps its content envelope as the result.
pub(crate) async fn handle_tools_call(
    params: Option<&Value>,
    executor: &ToolExecutor,
) -> Result<Value, DispatchError> {
    let params = params
        .ok_or_else(|| DispatchError::InvalidParams("params mancanti".to_string()))?;
    let call = serde_json::from_value::<ToolsCallParams>(params.clone())
        .map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

    debug!(tool = %call.name, "executing tool via MCP");
    let result = executor.call(&call.name, &call.arguments).await?;
    Ok(serde_json::to_value(result)?)
}
