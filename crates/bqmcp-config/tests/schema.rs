//! Integration tests for bqmcp-config schema types.

use bqmcp_config::schema::{BqmcpConfig, LoggingConfig, QueryConfig, ServerConfig, WarehouseConfig};

#[test]
fn config_default_values() {
    let config = BqmcpConfig::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.warehouse.project_id, "big-query-instilla");
    assert_eq!(
        config.warehouse.api_base_url,
        "https://bigquery.googleapis.com/bigquery/v2"
    );
    assert!(config.warehouse.credentials_json.is_none());
    assert!(config.warehouse.access_token.is_none());
    assert_eq!(config.query.default_limit, 100);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn section_defaults_match_top_level() {
    assert_eq!(ServerConfig::default().port, 8000);
    assert_eq!(QueryConfig::default().default_limit, 100);
    assert_eq!(LoggingConfig::default().level, "info");
    assert!(WarehouseConfig::default().location.is_none());
}

#[test]
fn deny_unknown_fields_rejects_extra_key() {
    let json = r#"{"server":{},"unknown_key":"bad"}"#;
    let result: Result<BqmcpConfig, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn deny_unknown_fields_in_sections() {
    let json = r#"{"warehouse":{"dataset":"sales"}}"#;
    let result: Result<BqmcpConfig, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn partial_config_uses_defaults_for_missing() {
    let json = r#"{"server":{"port":9000}}"#;
    let config: BqmcpConfig = serde_json::from_str(json).expect("parse");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.query.default_limit, 100);
}

#[test]
fn credentials_json_accepts_text_or_object() {
    let as_text = r#"{"warehouse":{"credentials_json":"{\"type\":\"service_account\"}"}}"#;
    let config: BqmcpConfig = serde_json::from_str(as_text).expect("text");
    assert_eq!(
        config.warehouse.credentials_json.as_deref(),
        Some(r#"{"type":"service_account"}"#)
    );

    let as_object = r#"{"warehouse":{"credentials_json":{"type":"service_account"}}}"#;
    let config: BqmcpConfig = serde_json::from_str(as_object).expect("object");
    let parsed: serde_json::Value =
        serde_json::from_str(config.warehouse.credentials_json.as_deref().expect("set"))
            .expect("json");
    assert_eq!(parsed["type"], "service_account");
}
