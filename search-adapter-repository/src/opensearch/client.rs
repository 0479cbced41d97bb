//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `IndexAdministration`
//! and `DocumentBackend` using the OpenSearch Rust client. The REST surface
//! used here is shared with Elasticsearch 7, so the same client serves both.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{
        IndicesCloseParts, IndicesCreateParts, IndicesExistsParts, IndicesOpenParts,
        IndicesPutMappingParts, IndicesPutSettingsParts,
    },
    CountParts, DeleteParts, GetParts, OpenSearch, SearchParts, UpdateParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use search_adapter_shared::DocumentId;

use crate::config::AdapterConfig;
use crate::errors::BackendError;
use crate::interfaces::{DocumentBackend, IndexAdministration};

/// OpenSearch client implementation.
///
/// Wraps a single-node connection pool. Connection-level settings (the
/// request timeout) are the only timeouts applied; the adapter itself never
/// retries.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200")?;
/// let exists = client.index_exists("orm").await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The backend URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(BackendError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str) -> Result<Self, BackendError> {
        Self::build(url, None)
    }

    /// Create a client from the adapter configuration.
    pub fn from_config(config: &AdapterConfig) -> Result<Self, BackendError> {
        Self::build(
            &config.host,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let parsed_url = Url::parse(url).map_err(|e| BackendError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let transport = builder
            .build()
            .map_err(|e| BackendError::connection(e.to_string()))?;

        info!(url = %url, timeout = ?timeout, "Created search backend client");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Turn a non-success response into a `BackendError`.
    async fn ensure_success(response: Response, operation: &str) -> Result<Response, BackendError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, operation, "Backend request failed");
        Err(BackendError::request_failed(status.as_u16(), body))
    }

    async fn read_json(response: Response, operation: &str) -> Result<Value, BackendError> {
        let response = Self::ensure_success(response, operation).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::parse(format!("{} response: {}", operation, e)))
    }
}

#[async_trait]
impl IndexAdministration for OpenSearchClient {
    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            404 => Ok(false),
            _ => Self::ensure_success(response, "exists").await.map(|_| true),
        }
    }

    #[instrument(skip(self, body))]
    async fn create_index(&self, index: &str, body: Value) -> Result<(), BackendError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        Self::ensure_success(response, "create").await?;
        debug!(index, "Index created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn close_index(&self, index: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .indices()
            .close(IndicesCloseParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        Self::ensure_success(response, "close").await?;
        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn put_settings(&self, index: &str, body: Value) -> Result<(), BackendError> {
        let response = self
            .client
            .indices()
            .put_settings(IndicesPutSettingsParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        Self::ensure_success(response, "put_settings").await?;
        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn put_mapping(
        &self,
        index: &str,
        type_name: &str,
        body: Value,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        Self::ensure_success(response, "put_mapping").await?;
        debug!(index, type_name, "Mapping applied");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn open_index(&self, index: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .indices()
            .open(IndicesOpenParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        Self::ensure_success(response, "open").await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for OpenSearchClient {
    async fn get(&self, index: &str, id: &DocumentId) -> Result<Value, BackendError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id.as_str()))
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Err(BackendError::not_found(id.as_str()));
        }

        Self::read_json(response, "get").await
    }

    async fn search(&self, index: &str, body: Value) -> Result<Value, BackendError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        Self::read_json(response, "search").await
    }

    async fn count(&self, index: &str, body: Value) -> Result<Value, BackendError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        Self::read_json(response, "count").await
    }

    // API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/#using-the-upsert-operation
    async fn update(
        &self,
        index: &str,
        type_name: &str,
        id: &DocumentId,
        body: Value,
    ) -> Result<Value, BackendError> {
        let response = self
            .client
            .update(UpdateParts::IndexId(index, id.as_str()))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        let value = Self::read_json(response, "update").await?;
        debug!(index, type_name, id = %id, "Document upserted");
        Ok(value)
    }

    async fn delete(
        &self,
        index: &str,
        type_name: &str,
        id: &DocumentId,
    ) -> Result<Value, BackendError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id.as_str()))
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Err(BackendError::not_found(id.as_str()));
        }

        let value = Self::read_json(response, "delete").await?;
        debug!(index, type_name, id = %id, "Document deleted");
        Ok(value)
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        let body = Self::read_json(response, "health").await?;
        Ok(body.get("status").and_then(Value::as_str) != Some("red"))
    }
}
