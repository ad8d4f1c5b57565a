//! bqmcp - BigQuery tools over MCP.

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use bqmcp_config::{load_config, ConfigOverrides};

mod commands;
mod input;
mod output;
pub(crate) mod shared;

/// bqmcp - Exposes BigQuery to MCP clients over HTTP/SSE.
#[derive(Debug, Parser)]
#[command(name = "bqmcp", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain (default) or json (for log aggregation).
    #[arg(long, global = true, default_value = "plain", value_parser = ["plain", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the MCP server over HTTP/SSE.
    Serve(commands::serve::ServeArgs),
    /// Print the tool descriptors as JSON.
    Tools(commands::tools::ToolsArgs),
    /// Run one tool once and print its result.
    Call(commands::call::CallArgs),
}

impl Commands {
    fn overrides(&self) -> ConfigOverrides {
        match self {
            Self::Serve(args) => ConfigOverrides {
                host: args.host.clone(),
                port: args.port,
                project_id: args.project.clone(),
            },
            Self::Call(args) => ConfigOverrides {
                project_id: args.project.clone(),
                ..ConfigOverrides::default()
            },
            Self::Tools(_) => ConfigOverrides::default(),
        }
    }
}

/// Picks the log filter: `-v` flags win over the configured level.
fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.command.overrides())?;

    // Initialize tracing.
    let filter = EnvFilter::try_new(log_filter(cli.verbose, &config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    match cli.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    };

    tracing::debug!(config_file = ?cli.config, "bqmcp starting");

    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(args, &config).await,
        Commands::Tools(args) => commands::tools::execute(args),
        Commands::Call(args) => commands::call::execute(args, &config).await,
    }
}
