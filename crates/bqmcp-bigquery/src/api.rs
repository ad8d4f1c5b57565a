//! BigQuery REST v2 wire types.
//!
//! Only the members the adapter reads are modelled; everything else in
//! the responses is ignored.

use std::collections::BTreeMap;

use bqmcp_warehouse::FieldSchema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `jobs.query`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub use_legacy_sql: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
}

/// Response of `jobs.query` and `jobs.getQueryResults`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub job_complete: bool,
    pub job_reference: Option<JobReference>,
    pub schema: Option<TableSchema>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

impl TableFieldSchema {
    /// BigQuery omits `mode` for nullable columns.
    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or("NULLABLE")
    }

    pub fn is_repeated(&self) -> bool {
        self.mode().eq_ignore_ascii_case("REPEATED")
    }

    pub fn is_record(&self) -> bool {
        matches!(
            self.field_type.to_ascii_uppercase().as_str(),
            "RECORD" | "STRUCT"
        )
    }
}

impl From<TableFieldSchema> for FieldSchema {
    fn from(f: TableFieldSchema) -> Self {
        let mode = f.mode().to_string();
        Self {
            name: f.name,
            field_type: f.field_type,
            mode,
            description: f.description,
            fields: f.fields.into_iter().map(FieldSchema::from).collect(),
        }
    }
}

/// A result row: one cell per schema field, in order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetList {
    #[serde(default)]
    pub datasets: Vec<DatasetListItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetListItem {
    pub dataset_reference: DatasetReference,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

/// Response of `datasets.get`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub location: Option<String>,
    pub creation_time: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    #[serde(default)]
    pub tables: Vec<TableListItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListItem {
    pub table_reference: TableReference,
    #[serde(rename = "type")]
    pub table_type: Option<String>,
    pub creation_time: Option<String>,
    pub num_rows: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

/// Response of `tables.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub table_reference: TableReference,
    pub num_rows: Option<String>,
    pub schema: Option<TableSchema>,
    pub creation_time: Option<String>,
    pub last_modified_time: Option<String>,
    pub description: Option<String>,
}

/// Google API error body.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}

/// Parses the epoch-millisecond strings used by metadata timestamps.
pub fn parse_millis(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw?.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Parses the decimal strings used for 64-bit counters such as `numRows`.
pub fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw?.parse::<u64>().ok()
}
