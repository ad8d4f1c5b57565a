//! `list_datasets`: every dataset in the project with its metadata.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use bqmcp_warehouse::{DatasetEntry, DatasetMetadata, DatasetRef, Warehouse};

use super::{FaultCause, NO_DESCRIPTION};

/// One rendered dataset. A dataset whose metadata could not be fetched
/// renders in the reduced `Unavailable` shape.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DatasetRecord {
    Detailed {
        dataset_id: String,
        project: String,
        location: Option<String>,
        created: Option<String>,
        description: String,
        labels: BTreeMap<String, String>,
    },
    Unavailable {
        dataset_id: String,
        project: String,
        full_name: String,
        error: String,
    },
}

impl From<DatasetEntry> for DatasetRecord {
    fn from(entry: DatasetEntry) -> Self {
        let DatasetEntry { reference, details } = entry;
        match details {
            Ok(meta) => Self::Detailed {
                dataset_id: reference.dataset_id,
                project: reference.project_id,
                location: meta.location,
                created: meta.created.map(|t| t.to_string()),
                description: meta
                    .description
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                labels: meta.labels,
            },
            Err(reason) => Self::Unavailable {
                full_name: reference.full_name(),
                dataset_id: reference.dataset_id,
                project: reference.project_id,
                error: format!("Impossibile ottenere dettagli: {reason}"),
            },
        }
    }
}

pub(super) async fn run(warehouse: &dyn Warehouse) -> Result<String, FaultCause> {
    let refs = warehouse.list_datasets().await?;
    let mut entries = Vec::with_capacity(refs.len());
    for reference in refs {
        entries.push(fetch_entry(warehouse, reference).await);
    }

    let records: Vec<DatasetRecord> = entries.into_iter().map(DatasetRecord::from).collect();
    let rendered = serde_json::to_string_pretty(&records)?;
    Ok(format!("Dataset trovati: {}\n\n{rendered}", records.len()))
}

async fn fetch_entry(warehouse: &dyn Warehouse, reference: DatasetRef) -> DatasetEntry {
    let details: Result<DatasetMetadata, String> = warehouse
        .get_dataset(&reference.dataset_id)
        .await
        .map_err(|e| {
            warn!(dataset = %reference.full_name(), error = %e, "dataset metadata unavailable");
            e.to_string()
        });
    DatasetEntry { reference, details }
}
