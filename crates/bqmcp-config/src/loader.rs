//! Configuration loader (file + env + CLI merge).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::Serialize;
use thiserror::Error;

use crate::schema::BqmcpConfig;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {0}")]
    MissingFile(String),
    /// Failed to load or merge configuration.
    #[error("configuration error: {0}")]
    Load(String),
}

/// Values given on the command line. They override every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub project_id: Option<String>,
}

#[derive(Serialize)]
struct OverrideLayer<'a> {
    server: ServerLayer<'a>,
    warehouse: WarehouseLayer<'a>,
}

#[derive(Serialize)]
struct ServerLayer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

#[derive(Serialize)]
struct WarehouseLayer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<&'a str>,
}

impl ConfigOverrides {
    fn layer(&self) -> OverrideLayer<'_> {
        OverrideLayer {
            server: ServerLayer {
                host: self.host.as_deref(),
                port: self.port,
            },
            warehouse: WarehouseLayer {
                project_id: self.project_id.as_deref(),
            },
        }
    }
}

/// Environment variables understood without the `BQMCP_` prefix, mapped
/// to their config keys.
const LEGACY_ENV: [(&str, &str); 3] = [
    ("PORT", "server.port"),
    ("GOOGLE_CLOUD_PROJECT", "warehouse.project_id"),
    (
        "GOOGLE_APPLICATION_CREDENTIALS_JSON",
        "warehouse.credentials_json",
    ),
];

fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV
            .iter()
            .find(|(name, _)| key == *name)
            .map(|(_, path)| (*path).into())
    })
}

/// Loads configuration by merging layers:
/// 1. Default values
/// 2. Config file (if given)
/// 3. Legacy env vars (`PORT`, `GOOGLE_CLOUD_PROJECT`,
///    `GOOGLE_APPLICATION_CREDENTIALS_JSON`)
/// 4. Environment variables (`BQMCP_` prefix, `__` between sections)
/// 5. Command-line overrides
///
/// # Errors
///
/// Returns `MissingFile` for a config path that does not exist and `Load`
/// for malformed values or unknown keys.
pub fn load_config(
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
) -> Result<BqmcpConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(BqmcpConfig::default()));

    if let Some(path) = config_path {
        if !std::path::Path::new(path).exists() {
            return Err(ConfigError::MissingFile(path.to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment = figment
        .merge(legacy_env())
        .merge(Env::prefixed("BQMCP_").split("__"))
        .merge(Serialized::defaults(overrides.layer()));

    figment
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))
}
