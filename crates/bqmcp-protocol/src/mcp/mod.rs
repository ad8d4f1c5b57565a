//! MCP (Model Context Protocol) type definitions.

pub mod initialize;
pub mod tools;

pub use initialize::*;
pub use tools::*;

/// MCP protocol method names served by this implementation.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
}
