//! Handles the `tools/list` MCP method.

use serde_json::Value;

use bqmcp_protocol::mcp::tools::ToolsListResult;

use crate::handler::DispatchError;
use crate::tools::tool_definitions;

/// Returns the four static tool descriptors. Params are ignored.
pub(crate) fn handle_tools_list() -> Result<Value, DispatchError> {
    let result = ToolsListResult {
        tools: tool_definitions(),
    };
    Ok(serde_json::to_value(result)?)
}
