//! # bqmcp-bigquery
//!
//! BigQuery adapter for the bqmcp warehouse port.
//! Talks to the BigQuery REST API v2 with `reqwest`, authenticating
//! through `gcp_auth` (or a fixed bearer token for emulators).

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
mod rows;

pub use auth::{AccessTokenSource, Credentials, GcpTokenSource, StaticToken, BIGQUERY_SCOPE};
pub use client::{BigQueryClient, ClientSettings, DEFAULT_API_BASE_URL};
pub use error::BigQueryError;
