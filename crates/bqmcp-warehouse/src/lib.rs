//! # bqmcp-warehouse
//!
//! Port definitions (abstract traits and data types) for the query
//! warehouse. Adapter crates such as `bqmcp-bigquery` implement them.

pub mod error;
pub mod model;
pub mod warehouse;

pub use error::WarehouseError;
pub use model::{
    DatasetEntry, DatasetMetadata, DatasetRef, FieldSchema, QueryRows, TableMetadata,
    TableSummary,
};
pub use warehouse::Warehouse;
