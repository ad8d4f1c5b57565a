//! Abstract warehouse trait (port).

use async_trait::async_trait;

use crate::error::WarehouseError;
use crate::model::{DatasetMetadata, DatasetRef, QueryRows, TableMetadata, TableSummary};

/// Read-mostly handle to the query warehouse.
///
/// One instance is built at startup and shared by every request, so
/// implementations must be safe for concurrent use.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Project all calls are scoped to.
    fn project_id(&self) -> &str;

    /// Runs a standard-SQL query and waits for every result row.
    async fn run_query(&self, sql: &str) -> Result<QueryRows, WarehouseError>;

    /// Lists every dataset in the project.
    async fn list_datasets(&self) -> Result<Vec<DatasetRef>, WarehouseError>;

    /// Fetches extended metadata for one dataset.
    async fn get_dataset(&self, dataset_id: &str) -> Result<DatasetMetadata, WarehouseError>;

    /// Lists every table in a dataset.
    async fn list_tables(&self, dataset_id: &str) -> Result<Vec<TableSummary>, WarehouseError>;

    /// Fetches table metadata and schema.
    async fn get_table(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableMetadata, WarehouseError>;
}
