//! In-memory `Warehouse` used by the dispatcher and executor tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use bqmcp_mcp::{McpHandler, ToolExecutor};
use bqmcp_warehouse::{
    DatasetMetadata, DatasetRef, QueryRows, TableMetadata, TableSummary, Warehouse,
    WarehouseError,
};

pub const PROJECT: &str = "test-project";

#[derive(Default)]
pub struct FakeWarehouse {
    pub rows: QueryRows,
    pub query_error: Option<String>,
    pub datasets: Vec<String>,
    pub dataset_meta: HashMap<String, DatasetMetadata>,
    pub tables: HashMap<String, Vec<TableSummary>>,
    pub table_meta: HashMap<(String, String), TableMetadata>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = rows
            .into_iter()
            .map(|v| match v {
                Value::Object(m) => m,
                _ => Map::new(),
            })
            .collect();
        self
    }

    pub fn with_dataset(mut self, id: &str, meta: Option<DatasetMetadata>) -> Self {
        self.datasets.push(id.to_string());
        if let Some(meta) = meta {
            self.dataset_meta.insert(id.to_string(), meta);
        }
        self
    }

    pub fn with_tables(mut self, dataset: &str, tables: Vec<TableSummary>) -> Self {
        self.tables.insert(dataset.to_string(), tables);
        self
    }

    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.table_meta
            .insert((table.dataset_id.clone(), table.table_id.clone()), table);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.queries.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Warehouse for FakeWarehouse {
    fn project_id(&self) -> &str {
        PROJECT
    }

    async fn run_query(&self, sql: &str) -> Result<QueryRows, WarehouseError> {
        self.queries.lock().expect("lock").push(sql.to_string());
        match &self.query_error {
            Some(message) => Err(WarehouseError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(self.rows.clone()),
        }
    }

    async fn list_datasets(&self) -> Result<Vec<DatasetRef>, WarehouseError> {
        Ok(self
            .datasets
            .iter()
            .map(|d| DatasetRef::new(PROJECT, d.as_str()))
            .collect())
    }

    async fn get_dataset(&self, dataset_id: &str) -> Result<DatasetMetadata, WarehouseError> {
        self.dataset_meta
            .get(dataset_id)
            .cloned()
            .ok_or_else(|| WarehouseError::Api {
                status: 403,
                message: format!("Access Denied: Dataset {PROJECT}:{dataset_id}"),
            })
    }

    async fn list_tables(&self, dataset_id: &str) -> Result<Vec<TableSummary>, WarehouseError> {
        self.tables
            .get(dataset_id)
            .cloned()
            .ok_or_else(|| WarehouseError::NotFound {
                resource: format!("Dataset {PROJECT}:{dataset_id}"),
            })
    }

    async fn get_table(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableMetadata, WarehouseError> {
        self.table_meta
            .get(&(dataset_id.to_string(), table_id.to_string()))
            .cloned()
            .ok_or_else(|| WarehouseError::NotFound {
                resource: format!("Table {PROJECT}:{dataset_id}.{table_id}"),
            })
    }
}

pub fn executor(warehouse: FakeWarehouse) -> (ToolExecutor, Arc<FakeWarehouse>) {
    let warehouse = Arc::new(warehouse);
    (ToolExecutor::new(warehouse.clone()), warehouse)
}

pub fn handler(warehouse: FakeWarehouse) -> McpHandler {
    McpHandler::new(executor(warehouse).0)
}

pub fn summary(dataset: &str, table: &str) -> TableSummary {
    TableSummary {
        project_id: PROJECT.to_string(),
        dataset_id: dataset.to_string(),
        table_id: table.to_string(),
        table_type: Some("TABLE".to_string()),
        created: None,
        num_rows: None,
    }
}
