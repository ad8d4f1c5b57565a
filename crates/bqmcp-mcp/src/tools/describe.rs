//! `describe_table`: table metadata and column schema.

use serde::Serialize;
use serde_json::Value;

use bqmcp_warehouse::{FieldSchema, TableMetadata, Warehouse};

use super::{text_arg, FaultCause, NO_DESCRIPTION};

#[derive(Debug, Serialize)]
struct ColumnRecord {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    mode: String,
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<ColumnRecord>,
}

impl From<FieldSchema> for ColumnRecord {
    fn from(field: FieldSchema) -> Self {
        let mode = if field.mode.is_empty() {
            "NULLABLE".to_string()
        } else {
            field.mode
        };
        Self {
            name: field.name,
            field_type: field.field_type,
            mode,
            description: field
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            fields: field.fields.into_iter().map(Self::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TableDescription {
    table_id: String,
    dataset_id: String,
    project: String,
    num_rows: Option<u64>,
    schema: Vec<ColumnRecord>,
    created: Option<String>,
    modified: Option<String>,
    description: String,
}

impl From<TableMetadata> for TableDescription {
    fn from(table: TableMetadata) -> Self {
        Self {
            table_id: table.table_id,
            dataset_id: table.dataset_id,
            project: table.project_id,
            num_rows: table.num_rows,
            schema: table.schema.into_iter().map(ColumnRecord::from).collect(),
            created: table.created.map(|t| t.to_string()),
            modified: table.modified.map(|t| t.to_string()),
            description: table
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        }
    }
}

pub(super) async fn run(warehouse: &dyn Warehouse, args: &Value) -> Result<String, FaultCause> {
    let dataset_id = text_arg(args, "dataset_id")?;
    let table_id = text_arg(args, "table_id")?;
    let table = warehouse.get_table(&dataset_id, &table_id).await?;
    let rendered = serde_json::to_string_pretty(&TableDescription::from(table))?;
    Ok(format!(
        "Descrizione tabella {dataset_id}.{table_id}:\n\n{rendered}"
    ))
}
