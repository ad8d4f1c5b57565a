//! Access tokens for BigQuery calls.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};

use crate::error::BigQueryError;

/// OAuth scope requested for every BigQuery call.
pub const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

/// Supplies the bearer token attached to each request.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> Result<String, BigQueryError>;
}

/// Where credentials come from.
#[derive(Clone)]
pub enum Credentials {
    /// Application default credentials: `GOOGLE_APPLICATION_CREDENTIALS`,
    /// gcloud, or the metadata server.
    Ambient,
    /// Service-account key JSON held in memory.
    ServiceAccountJson(String),
    /// Path to a service-account key file.
    ServiceAccountFile(PathBuf),
    /// Fixed bearer token, for emulators and tests.
    Static(String),
}

// Key material stays out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambient => f.write_str("Ambient"),
            Self::ServiceAccountJson(_) => f.write_str("ServiceAccountJson(..)"),
            Self::ServiceAccountFile(path) => {
                f.debug_tuple("ServiceAccountFile").field(path).finish()
            }
            Self::Static(_) => f.write_str("Static(..)"),
        }
    }
}

impl Credentials {
    /// Resolves the credentials into a token source.
    ///
    /// # Errors
    ///
    /// Returns `BigQueryError::Auth` if the key is malformed or no ambient
    /// credentials can be found.
    pub async fn into_token_source(self) -> Result<Arc<dyn AccessTokenSource>, BigQueryError> {
        let source: Arc<dyn AccessTokenSource> = match self {
            Self::Ambient => Arc::new(GcpTokenSource::ambient().await?),
            Self::ServiceAccountJson(json) => {
                Arc::new(GcpTokenSource::from_service_account_json(&json)?)
            }
            Self::ServiceAccountFile(path) => {
                Arc::new(GcpTokenSource::from_service_account_file(path)?)
            }
            Self::Static(token) => Arc::new(StaticToken::new(token)),
        };
        Ok(source)
    }
}

/// Token source backed by `gcp_auth`, which caches and refreshes tokens.
pub struct GcpTokenSource {
    provider: Arc<dyn TokenProvider>,
}

impl GcpTokenSource {
    /// Uses a service-account key given as JSON text.
    pub fn from_service_account_json(json: &str) -> Result<Self, BigQueryError> {
        let account = CustomServiceAccount::from_json(json)
            .map_err(|e| BigQueryError::Auth(format!("invalid service account JSON: {e}")))?;
        Ok(Self {
            provider: Arc::new(account),
        })
    }

    /// Uses a service-account key file.
    pub fn from_service_account_file(path: PathBuf) -> Result<Self, BigQueryError> {
        let account = CustomServiceAccount::from_file(&path).map_err(|e| {
            BigQueryError::Auth(format!(
                "cannot load service account from {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self {
            provider: Arc::new(account),
        })
    }

    /// Discovers application default credentials.
    pub async fn ambient() -> Result<Self, BigQueryError> {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| BigQueryError::Auth(format!("no ambient credentials: {e}")))?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl AccessTokenSource for GcpTokenSource {
    async fn access_token(&self) -> Result<String, BigQueryError> {
        let token = self
            .provider
            .token(&[BIGQUERY_SCOPE])
            .await
            .map_err(|e| BigQueryError::Auth(e.to_string()))?;
        Ok(token.as_str().to_string())
    }
}

/// A token that never changes.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Creates a static token source.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, BigQueryError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials::ServiceAccountJson("{\"private_key\":\"secret\"}".into());
        assert!(!format!("{creds:?}").contains("secret"));
        let creds = Credentials::Static("tok-123".into());
        assert!(!format!("{creds:?}").contains("tok-123"));
    }

    #[test]
    fn malformed_service_account_json_is_auth_error() {
        let err = GcpTokenSource::from_service_account_json("{not json")
            .err()
            .expect("should fail");
        assert!(matches!(err, BigQueryError::Auth(_)));
    }

    #[test]
    fn missing_key_file_is_auth_error() {
        let err = GcpTokenSource::from_service_account_file(PathBuf::from(
            "/nonexistent/bqmcp/key.json",
        ))
        .err()
        .expect("should fail");
        assert!(err.to_string().contains("/nonexistent/bqmcp/key.json"));
    }
}
