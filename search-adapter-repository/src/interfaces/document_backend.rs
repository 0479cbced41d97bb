//! Document backend trait definition.
//!
//! This module defines the document operations the CRUD facade issues,
//! allowing for different backend implementations (Elasticsearch, OpenSearch,
//! mocks).

use async_trait::async_trait;
use search_adapter_shared::DocumentId;
use serde_json::Value;

use crate::errors::BackendError;

/// Abstract interface for document operations.
///
/// Every method issues exactly one backend call and returns the raw JSON
/// response body; shaping it into records is left to the caller.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// Non-success responses become `BackendError::RequestFailed`, except a
/// missing document on `get`, which is `BackendError::NotFound`.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Fetch a single document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The get response (`{_id, found, _source, ...}`)
    /// * `Err(BackendError::NotFound)` - If no document has this id
    /// * `Err(BackendError)` - If the request fails
    async fn get(&self, index: &str, id: &DocumentId) -> Result<Value, BackendError>;

    /// Execute a search body against the index.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let body = json!({ "query": { "match_all": {} }, "size": 10 });
    /// let response = backend.search("orm", body).await?;
    /// let hits = &response["hits"]["hits"];
    /// ```
    async fn search(&self, index: &str, body: Value) -> Result<Value, BackendError>;

    /// Count the documents matching a query body.
    async fn count(&self, index: &str, body: Value) -> Result<Value, BackendError>;

    /// Partially update a document.
    ///
    /// The body is a backend update body; the adapter always sends
    /// `{doc, doc_as_upsert: true}` so the document is created when absent.
    async fn update(
        &self,
        index: &str,
        type_name: &str,
        id: &DocumentId,
        body: Value,
    ) -> Result<Value, BackendError>;

    /// Delete a single document by id.
    async fn delete(
        &self,
        index: &str,
        type_name: &str,
        id: &DocumentId,
    ) -> Result<Value, BackendError>;

    /// Check if the backend is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster is healthy
    /// * `Ok(false)` - If the cluster reports a red status
    /// * `Err(BackendError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, BackendError>;
}
