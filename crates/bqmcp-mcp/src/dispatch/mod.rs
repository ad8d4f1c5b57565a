//! MCP method dispatch functions.
//!
//! Each sub-module handles one MCP method as a free function returning
//! the `result` value, keeping `McpHandler` itself thin.

pub(crate) mod initialize;
pub(crate) mod tools_call;
pub(crate) mod tools_list;
