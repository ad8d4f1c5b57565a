//! `bqmcp call` command.
//!
//! Runs a single tool against BigQuery without starting the server.

use clap::Args;

use bqmcp_config::BqmcpConfig;

use crate::{input, output, shared};

/// Run one tool once.
#[derive(Debug, Args)]
pub struct CallArgs {
    /// Tool name (query_bigquery, list_datasets, list_tables, describe_table).
    pub tool: String,
    /// JSON object of tool arguments.
    #[arg(short, long, default_value = "{}")]
    pub args: String,
    /// Read the arguments from a file (use "-" for stdin).
    #[arg(short = 'f', long)]
    pub args_file: Option<String>,
    /// BigQuery project (default from config).
    #[arg(long)]
    pub project: Option<String>,
}

/// Executes the call command.
pub async fn execute(args: &CallArgs, config: &BqmcpConfig) -> anyhow::Result<()> {
    let arguments = input::resolve_args(&args.args, args.args_file.as_deref())?;
    let executor = shared::create_executor(config).await?;

    tracing::info!(tool = %args.tool, "calling tool");
    let result = executor
        .call(&args.tool, &arguments)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let text = result.joined_text();
    if result.is_error {
        output::print_error(&text);
    } else {
        println!("{text}");
    }
    Ok(())
}
