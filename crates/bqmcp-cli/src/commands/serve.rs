//! `bqmcp serve` command.
//!
//! Starts the MCP server over HTTP/SSE, exposing the BigQuery tools via
//! JSON-RPC 2.0.

use std::sync::Arc;

use clap::Args;

use bqmcp_config::BqmcpConfig;
use bqmcp_mcp::McpHandler;
use bqmcp_transport_http::HttpServer;

use crate::shared;

/// Start the MCP server.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind (default 0.0.0.0).
    #[arg(long)]
    pub host: Option<String>,
    /// TCP port (default 8000, or $PORT).
    #[arg(long)]
    pub port: Option<u16>,
    /// BigQuery project (default from config or $GOOGLE_CLOUD_PROJECT).
    #[arg(long)]
    pub project: Option<String>,
}

/// Executes the serve command.
pub async fn execute(_args: &ServeArgs, config: &BqmcpConfig) -> anyhow::Result<()> {
    let executor = shared::create_executor(config).await?;
    let project_id = executor.project_id().to_string();
    let handler = Arc::new(McpHandler::new(executor));

    let addr = HttpServer::parse_addr(&config.server.host, config.server.port)?;
    let server = HttpServer::new(handler, project_id, addr);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}
