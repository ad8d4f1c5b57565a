//! The four BigQuery tools and the executor that runs them.
//!
//! Every tool catches its own faults: a failing warehouse call or a bad
//! argument produces a normal content envelope whose text starts with an
//! Italian fault description and whose `isError` flag is set. Only an
//! unknown tool name escapes as an error, to be reported by the
//! dispatcher.

pub mod catalog;
mod datasets;
mod describe;
pub mod limit;
mod query;
mod tables;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use bqmcp_protocol::mcp::tools::ToolsCallResult;
use bqmcp_protocol::schema::{validate_required_fields, SchemaError};
use bqmcp_warehouse::{Warehouse, WarehouseError};

pub use catalog::tool_definitions;
pub use limit::DEFAULT_ROW_LIMIT;

/// Description placeholder for datasets, tables and columns without one.
pub(crate) const NO_DESCRIPTION: &str = "Nessuna descrizione";

/// The fixed set of tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    QueryBigquery,
    ListDatasets,
    ListTables,
    DescribeTable,
}

impl Tool {
    /// Every tool, in `tools/list` order.
    pub const ALL: [Tool; 4] = [
        Tool::QueryBigquery,
        Tool::ListDatasets,
        Tool::ListTables,
        Tool::DescribeTable,
    ];

    /// Wire name of the tool.
    pub fn name(self) -> &'static str {
        match self {
            Self::QueryBigquery => "query_bigquery",
            Self::ListDatasets => "list_datasets",
            Self::ListTables => "list_tables",
            Self::DescribeTable => "describe_table",
        }
    }

    /// Leading words of the fault text this tool renders.
    pub fn fault_prefix(self) -> &'static str {
        match self {
            Self::QueryBigquery => "Errore nell'esecuzione della query",
            Self::ListDatasets => "Errore nel recuperare i dataset",
            Self::ListTables => "Errore nel recuperare le tabelle",
            Self::DescribeTable => "Errore nel descrivere la tabella",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// Errors that escape the executor.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name exists.
    #[error("Strumento non trovato: {0}")]
    UnknownTool(String),
}

/// Why a tool call failed.
#[derive(Debug, Error)]
pub enum FaultCause {
    /// The warehouse rejected or failed the call.
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),
    /// A required argument is missing, or the arguments are not an object.
    #[error(transparent)]
    Arguments(#[from] SchemaError),
    /// An argument is present but unusable.
    #[error("argomento '{name}' non valido: {reason}")]
    InvalidArgument { name: String, reason: String },
    /// The result could not be rendered as JSON.
    #[error("impossibile serializzare il risultato: {0}")]
    Render(#[from] serde_json::Error),
}

/// A tool-level fault, rendered as text in the content envelope.
#[derive(Debug, Error)]
#[error("{}: {}", .tool.fault_prefix(), .cause)]
pub struct ToolFault {
    /// The failing tool.
    pub tool: Tool,
    /// What went wrong.
    #[source]
    pub cause: FaultCause,
}

/// Runs tools against the shared warehouse handle.
#[derive(Clone)]
pub struct ToolExecutor {
    warehouse: Arc<dyn Warehouse>,
    default_limit: u64,
}

impl ToolExecutor {
    /// Creates an executor with the default row limit of 100.
    pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            warehouse,
            default_limit: DEFAULT_ROW_LIMIT,
        }
    }

    /// Overrides the row limit applied when a query gives none.
    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    /// Row limit applied when a query gives none.
    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// Project the warehouse is scoped to.
    pub fn project_id(&self) -> &str {
        self.warehouse.project_id()
    }

    /// Runs the named tool.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::UnknownTool` for names outside the catalog.
    /// Every other failure is reported inside the returned envelope.
    pub async fn call(&self, name: &str, args: &Value) -> Result<ToolsCallResult, ToolError> {
        let tool: Tool = name.parse()?;
        let started = Instant::now();

        let result = match self.run(tool, args).await {
            Ok(text) => {
                info!(
                    %tool,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "tool call succeeded"
                );
                ToolsCallResult::text(text)
            }
            Err(cause) => {
                let fault = ToolFault { tool, cause };
                warn!(%tool, error = %fault, "tool call failed");
                ToolsCallResult::error_text(fault.to_string())
            }
        };
        Ok(result)
    }

    async fn run(&self, tool: Tool, args: &Value) -> Result<String, FaultCause> {
        validate_required_fields(&tool.input_schema(), args)?;
        let warehouse = self.warehouse.as_ref();
        match tool {
            Tool::QueryBigquery => query::run(warehouse, args, self.default_limit).await,
            Tool::ListDatasets => datasets::run(warehouse).await,
            Tool::ListTables => tables::run(warehouse, args).await,
            Tool::DescribeTable => describe::run(warehouse, args).await,
        }
    }
}

/// Reads a required scalar argument as text. Numbers are accepted and
/// stringified; presence was already checked against the schema.
pub(crate) fn text_arg(args: &Value, name: &str) -> Result<String, FaultCause> {
    match args.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(FaultCause::InvalidArgument {
            name: name.to_string(),
            reason: "stringa vuota".to_string(),
        }),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Null) | None => Err(SchemaError::MissingField {
            field: name.to_string(),
        }
        .into()),
        Some(other) => Err(FaultCause::InvalidArgument {
            name: name.to_string(),
            reason: format!("atteso testo, ricevuto {other}"),
        }),
    }
}
