//! Configuration schema types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BqmcpConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// BigQuery connection settings.
    #[serde(default)]
    pub warehouse: WarehouseConfig,
    /// Query tool settings.
    #[serde(default)]
    pub query: QueryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

/// Warehouse connection configuration.
///
/// Credentials are tried in this order: `access_token`,
/// `credentials_json`, `credentials_file`, then ambient credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseConfig {
    /// Project every call is scoped to.
    #[serde(default = "default_project_id")]
    pub project_id: String,
    /// Inline service-account key.
    #[serde(
        default,
        deserialize_with = "json_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub credentials_json: Option<String>,
    /// Path to a service-account key file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
    /// Fixed bearer token, for emulators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// REST API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Job location, e.g. `EU`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            credentials_json: None,
            credentials_file: None,
            access_token: None,
            api_base_url: default_api_base_url(),
            location: None,
        }
    }
}

fn default_project_id() -> String {
    "big-query-instilla".to_string()
}
fn default_api_base_url() -> String {
    "https://bigquery.googleapis.com/bigquery/v2".to_string()
}

/// Accepts the key either as JSON text or as an already-parsed table,
/// which is what env and TOML providers may hand over.
fn json_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// `query_bigquery` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Rows appended as `LIMIT` when a query has none. Zero disables it.
    #[serde(default = "default_limit")]
    pub default_limit: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> u64 {
    100
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "bqmcp_bigquery=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
