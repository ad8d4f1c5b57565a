//! Warehouse metadata and result types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rows returned by a query, each keyed by column name.
pub type QueryRows = Vec<Map<String, Value>>;

/// A dataset as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    /// Owning project.
    pub project_id: String,
    /// Dataset identifier within the project.
    pub dataset_id: String,
}

impl DatasetRef {
    /// Creates a dataset reference.
    pub fn new(project_id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
        }
    }

    /// `project.dataset`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.project_id, self.dataset_id)
    }
}

/// Extended dataset metadata from a per-dataset fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Geographic location, e.g. `EU`.
    pub location: Option<String>,
    /// Creation time.
    pub created: Option<DateTime<Utc>>,
    /// Free-form description.
    pub description: Option<String>,
    /// User labels.
    pub labels: BTreeMap<String, String>,
}

/// Outcome of fetching one dataset's metadata during a listing.
///
/// A failed fetch is kept per item so one broken dataset does not fail
/// the whole listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    /// The listed dataset.
    pub reference: DatasetRef,
    /// Metadata, or the description of the fetch fault.
    pub details: Result<DatasetMetadata, String>,
}

/// A table as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
    /// `TABLE`, `VIEW`, `EXTERNAL`, ...
    pub table_type: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub num_rows: Option<u64>,
}

impl TableSummary {
    /// `project.dataset.table`.
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// One column of a table schema. RECORD columns carry nested `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    /// Column type as reported by the warehouse (`STRING`, `INTEGER`, ...).
    pub field_type: String,
    /// `NULLABLE`, `REQUIRED` or `REPEATED`.
    pub mode: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

/// Full table metadata including its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
    pub num_rows: Option<u64>,
    pub schema: Vec<FieldSchema>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_full_name() {
        let ds = DatasetRef::new("proj", "sales");
        assert_eq!(ds.full_name(), "proj.sales");
    }

    #[test]
    fn table_full_name() {
        let t = TableSummary {
            project_id: "proj".into(),
            dataset_id: "sales".into(),
            table_id: "orders".into(),
            table_type: Some("TABLE".into()),
            created: None,
            num_rows: None,
        };
        assert_eq!(t.full_name(), "proj.sales.orders");
    }
}
