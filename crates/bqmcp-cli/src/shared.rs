//! Shared helpers used across CLI commands.
//!
//! Centralises building the BigQuery client and the tool executor from
//! the merged configuration.

use std::path::PathBuf;
use std::sync::Arc;

use bqmcp_bigquery::{BigQueryClient, ClientSettings, Credentials};
use bqmcp_config::schema::WarehouseConfig;
use bqmcp_config::BqmcpConfig;
use bqmcp_mcp::ToolExecutor;

/// Chooses the credential source: a static token first, then inline
/// service-account JSON, then a key file, then ambient credentials.
pub fn credentials_from(config: &WarehouseConfig) -> Credentials {
    if let Some(token) = &config.access_token {
        return Credentials::Static(token.clone());
    }
    if let Some(json) = &config.credentials_json {
        return Credentials::ServiceAccountJson(json.clone());
    }
    if let Some(path) = &config.credentials_file {
        return Credentials::ServiceAccountFile(PathBuf::from(path));
    }
    Credentials::Ambient
}

/// Connects to BigQuery and wraps the client in a tool executor.
///
/// # Errors
///
/// Returns an error if credentials cannot be loaded or the API URL is
/// invalid.
pub async fn create_executor(config: &BqmcpConfig) -> anyhow::Result<ToolExecutor> {
    let warehouse = &config.warehouse;
    let settings = ClientSettings {
        project_id: warehouse.project_id.clone(),
        api_base_url: warehouse.api_base_url.clone(),
        location: warehouse.location.clone(),
        credentials: credentials_from(warehouse),
    };
    tracing::debug!(credentials = ?settings.credentials, "connecting to BigQuery");
    let client = BigQueryClient::connect(settings)
        .await
        .map_err(|e| anyhow::anyhow!("BigQuery client init error: {e}"))?;
    Ok(ToolExecutor::new(Arc::new(client)).with_default_limit(config.query.default_limit))
}
