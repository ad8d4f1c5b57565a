//! `Warehouse` implementation over the BigQuery REST API v2.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use bqmcp_warehouse::{
    DatasetMetadata, DatasetRef, FieldSchema, QueryRows, TableMetadata, TableSummary, Warehouse,
    WarehouseError,
};

use crate::api::{
    parse_count, parse_millis, Dataset, DatasetList, ErrorEnvelope, JobReference, QueryRequest,
    QueryResponse, Table, TableFieldSchema, TableList,
};
use crate::auth::{AccessTokenSource, Credentials};
use crate::error::BigQueryError;
use crate::rows::decode_row;

/// Production endpoint of the BigQuery REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Everything needed to build a `BigQueryClient`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Project every call is scoped to.
    pub project_id: String,
    /// API root, overridable for emulators.
    pub api_base_url: String,
    /// Default job location (`EU`, `US`, ...), if not the project default.
    pub location: Option<String>,
    /// Credential source.
    pub credentials: Credentials,
}

/// BigQuery REST client. Cheap to share behind an `Arc`.
pub struct BigQueryClient {
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenSource>,
    project_id: String,
    base_url: Url,
    location: Option<String>,
}

impl BigQueryClient {
    /// Resolves credentials and builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be loaded or the base URL
    /// is invalid.
    pub async fn connect(settings: ClientSettings) -> Result<Self, BigQueryError> {
        let tokens = settings.credentials.into_token_source().await?;
        let client = Self::with_token_source(
            settings.project_id,
            &settings.api_base_url,
            settings.location,
            tokens,
        )?;
        tracing::info!(project = %client.project_id, "BigQuery client initialised");
        Ok(client)
    }

    /// Builds a client around an existing token source.
    pub fn with_token_source(
        project_id: impl Into<String>,
        api_base_url: &str,
        location: Option<String>,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Result<Self, BigQueryError> {
        let base_url = Url::parse(api_base_url)
            .map_err(|_| BigQueryError::InvalidUrl(api_base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BigQueryError::InvalidUrl(api_base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("bqmcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            tokens,
            project_id: project_id.into(),
            base_url,
            location,
        })
    }

    /// Appends percent-encoded path segments to the API root.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BigQueryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BigQueryError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, BigQueryError> {
        trace!(%url, "GET");
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, BigQueryError> {
        trace!(%url, "POST");
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        decode_response(response).await
    }

    async fn get_query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse, BigQueryError> {
        let url = self.endpoint(&["projects", &job.project_id, "queries", &job.job_id])?;
        let mut query = Vec::new();
        if let Some(location) = job.location.as_deref().or(self.location.as_deref()) {
            query.push(("location", location));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        self.get_json(url, &query).await
    }

    /// Runs a query, polling until the job completes and every page is read.
    pub async fn query(&self, sql: &str) -> Result<QueryRows, BigQueryError> {
        let url = self.endpoint(&["projects", &self.project_id, "queries"])?;
        let request = QueryRequest {
            query: sql,
            use_legacy_sql: false,
            location: self.location.as_deref(),
        };
        let mut page: QueryResponse = self.post_json(url, &request).await?;
        let job = page.job_reference.clone();

        let mut fields: Vec<TableFieldSchema> = Vec::new();
        let mut rows = QueryRows::new();
        loop {
            if let Some(schema) = page.schema.take() {
                fields = schema.fields;
            }
            rows.extend(page.rows.iter().map(|row| decode_row(&fields, row)));

            let next_token = if page.job_complete {
                match page.page_token.take() {
                    Some(token) => Some(token),
                    None => break,
                }
            } else {
                None
            };
            let job = job.as_ref().ok_or_else(|| {
                BigQueryError::Decode("query response has no jobReference".to_string())
            })?;
            debug!(job_id = %job.job_id, complete = page.job_complete, "fetching query results");
            page = self.get_query_results(job, next_token.as_deref()).await?;
        }

        debug!(rows = rows.len(), "query finished");
        Ok(rows)
    }

    /// Lists every dataset, following page tokens.
    pub async fn datasets(&self) -> Result<Vec<DatasetRef>, BigQueryError> {
        let url = self.endpoint(&["projects", &self.project_id, "datasets"])?;
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let query: Vec<(&str, &str)> = page_token
                .as_deref()
                .map(|t| vec![("pageToken", t)])
                .unwrap_or_default();
            let page: DatasetList = self.get_json(url.clone(), &query).await?;
            out.extend(page.datasets.into_iter().map(|d| {
                DatasetRef::new(d.dataset_reference.project_id, d.dataset_reference.dataset_id)
            }));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(out)
    }

    /// Fetches one dataset's metadata.
    pub async fn dataset(&self, dataset_id: &str) -> Result<DatasetMetadata, BigQueryError> {
        let url = self.endpoint(&["projects", &self.project_id, "datasets", dataset_id])?;
        let ds: Dataset = self.get_json(url, &[]).await?;
        Ok(DatasetMetadata {
            location: ds.location,
            created: parse_millis(ds.creation_time.as_deref()),
            description: ds.description,
            labels: ds.labels,
        })
    }

    /// Lists every table in a dataset, following page tokens.
    pub async fn tables(&self, dataset_id: &str) -> Result<Vec<TableSummary>, BigQueryError> {
        let url = self.endpoint(&["projects", &self.project_id, "datasets", dataset_id, "tables"])?;
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let query: Vec<(&str, &str)> = page_token
                .as_deref()
                .map(|t| vec![("pageToken", t)])
                .unwrap_or_default();
            let page: TableList = self.get_json(url.clone(), &query).await?;
            out.extend(page.tables.into_iter().map(|t| TableSummary {
                created: parse_millis(t.creation_time.as_deref()),
                num_rows: parse_count(t.num_rows.as_deref()),
                project_id: t.table_reference.project_id,
                dataset_id: t.table_reference.dataset_id,
                table_id: t.table_reference.table_id,
                table_type: t.table_type,
            }));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(out)
    }

    /// Fetches table metadata and schema.
    pub async fn table(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableMetadata, BigQueryError> {
        let url = self.endpoint(&[
            "projects",
            &self.project_id,
            "datasets",
            dataset_id,
            "tables",
            table_id,
        ])?;
        let t: Table = self.get_json(url, &[]).await?;
        Ok(TableMetadata {
            num_rows: parse_count(t.num_rows.as_deref()),
            schema: t
                .schema
                .map(|s| s.fields.into_iter().map(FieldSchema::from).collect())
                .unwrap_or_default(),
            created: parse_millis(t.creation_time.as_deref()),
            modified: parse_millis(t.last_modified_time.as_deref()),
            description: t.description,
            project_id: t.table_reference.project_id,
            dataset_id: t.table_reference.dataset_id,
            table_id: t.table_reference.table_id,
        })
    }
}

/// Turns a response into `T`, or into an error decoded from the Google
/// error body.
async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, BigQueryError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| BigQueryError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    };
    if status == StatusCode::NOT_FOUND {
        Err(BigQueryError::NotFound { message })
    } else {
        Err(BigQueryError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Warehouse for BigQueryClient {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn run_query(&self, sql: &str) -> Result<QueryRows, WarehouseError> {
        Ok(self.query(sql).await?)
    }

    async fn list_datasets(&self) -> Result<Vec<DatasetRef>, WarehouseError> {
        Ok(self.datasets().await?)
    }

    async fn get_dataset(&self, dataset_id: &str) -> Result<DatasetMetadata, WarehouseError> {
        Ok(self.dataset(dataset_id).await?)
    }

    async fn list_tables(&self, dataset_id: &str) -> Result<Vec<TableSummary>, WarehouseError> {
        Ok(self.tables(dataset_id).await?)
    }

    async fn get_table(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableMetadata, WarehouseError> {
        Ok(self.table(dataset_id, table_id).await?)
    }
}
