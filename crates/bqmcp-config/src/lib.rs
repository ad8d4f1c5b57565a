//! # bqmcp-config
//!
//! Configuration management for the BigQuery MCP server.
//! Supports layered config: defaults -> file -> env vars -> CLI flags.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::BqmcpConfig;
