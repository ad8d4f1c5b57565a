//! `bqmcp tools` command.

use clap::Args;

use bqmcp_mcp::tool_definitions;
use bqmcp_protocol::mcp::tools::ToolsListResult;

/// Print the tool descriptors.
#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Print names only, one per line.
    #[arg(long)]
    pub names: bool,
}

/// Executes the tools command.
pub fn execute(args: &ToolsArgs) -> anyhow::Result<()> {
    let tools = tool_definitions();
    if args.names {
        for tool in &tools {
            println!("{}", tool.name);
        }
        return Ok(());
    }
    let listing = ToolsListResult { tools };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
