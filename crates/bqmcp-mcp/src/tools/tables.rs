//! `list_tables`: tables of one dataset.

use serde::Serialize;
use serde_json::Value;

use bqmcp_warehouse::{TableSummary, Warehouse};

use super::{text_arg, FaultCause};

#[derive(Debug, Serialize)]
struct TableRecord {
    table_id: String,
    table_type: Option<String>,
    full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_rows: Option<u64>,
}

impl From<TableSummary> for TableRecord {
    fn from(table: TableSummary) -> Self {
        Self {
            full_name: table.full_name(),
            table_id: table.table_id,
            table_type: table.table_type,
            created: table.created.map(|t| t.to_string()),
            num_rows: table.num_rows,
        }
    }
}

pub(super) async fn run(warehouse: &dyn Warehouse, args: &Value) -> Result<String, FaultCause> {
    let dataset_id = text_arg(args, "dataset_id")?;
    let tables = warehouse.list_tables(&dataset_id).await?;
    let records: Vec<TableRecord> = tables.into_iter().map(TableRecord::from).collect();
    let rendered = serde_json::to_string_pretty(&records)?;
    Ok(format!(
        "Tabelle nel dataset {dataset_id}: {}\n\n{rendered}",
        records.len()
    ))
}
