//! # bqmcp-mcp
//!
//! MCP request dispatcher and the BigQuery tool executor.
//!
//! `McpHandler` turns JSON-RPC requests into responses; `ToolExecutor`
//! runs the four tools against any `Warehouse` implementation.

pub(crate) mod dispatch;
pub mod handler;
pub mod tools;

pub use handler::{DispatchError, JsonRpcOutput, McpHandler};
pub use tools::{
    tool_definitions, FaultCause, Tool, ToolError, ToolExecutor, ToolFault, DEFAULT_ROW_LIMIT,
};
