//! ORM adapter facade.
//!
//! This module provides the entry points an ORM calls: select, query,
//! count, insert, update and destroy. Each builds a backend request through
//! the query translator, issues exactly one backend call and shapes the
//! response through the record mapper.
//!
//! Collections share the index. Each one only sees its own documents: ids
//! are prefixed with the collection name and searches filter on `model`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument};

use search_adapter_shared::{Criteria, DocumentId, Record, ID_FIELD};

use crate::config::AdapterConfig;
use crate::errors::{AdapterError, BackendError, ProvisioningError};
use crate::interfaces::{DocumentBackend, IndexAdministration};
use crate::opensearch::{
    build_count_body, build_search_request, build_upsert_body, document_id, map_count_response,
    map_get_response, map_search_response, MODEL_FIELD,
};
use crate::provisioner::IndexProvisioner;
use crate::types::SelectResult;

/// The adapter an ORM talks to.
///
/// Holds the injected backend and the configuration; no other state. Calls
/// are independent of each other and concurrent writes to the same id are
/// last-writer-wins on the backend.
pub struct SearchAdapter {
    backend: Arc<dyn DocumentBackend>,
    config: AdapterConfig,
}

impl SearchAdapter {
    /// Create an adapter over an already provisioned index.
    pub fn new(backend: Arc<dyn DocumentBackend>, config: AdapterConfig) -> Self {
        Self { backend, config }
    }

    /// Provision the index, then hand out the adapter.
    ///
    /// Document operations must not be issued before provisioning completes;
    /// going through this constructor makes that ordering explicit.
    pub async fn initialize<B>(
        backend: Arc<B>,
        config: AdapterConfig,
    ) -> Result<Self, ProvisioningError>
    where
        B: IndexAdministration + DocumentBackend + 'static,
    {
        let outcome = IndexProvisioner::new(backend.clone(), config.index.clone())
            .ensure_index()
            .await?;
        info!(index = %config.index.name, outcome = ?outcome, "Search adapter ready");

        Ok(Self::new(backend, config))
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Name of the index every collection lives in.
    pub fn index_name(&self) -> &str {
        &self.config.index.name
    }

    /// Fetch records.
    ///
    /// A `where.id` fetches that single document directly and ignores the
    /// rest of the criteria; anything else runs a search.
    ///
    /// # Returns
    ///
    /// * `Ok(SelectResult::One)` - The document addressed by `where.id`
    /// * `Ok(SelectResult::Many)` - The search hits, with `_score` when enabled
    /// * `Err(AdapterError)` - If the backend fails or answers malformed
    #[instrument(skip(self, criteria))]
    pub async fn select(
        &self,
        collection: &str,
        criteria: &Criteria,
    ) -> Result<SelectResult, AdapterError> {
        if let Some(id) = criteria.point_lookup() {
            let response = self
                .backend
                .get(self.index_name(), &document_id(collection, id))
                .await
                .map_err(|e| failed("select", collection, e))?;
            return map_get_response(response).map(without_model).map(SelectResult::One);
        }

        let request = build_search_request(self.index_name(), collection, criteria);
        debug!(body = %request.body, "Searching");

        let response = self
            .backend
            .search(&request.index, request.body)
            .await
            .map_err(|e| failed("select", collection, e))?;

        let records = map_search_response(&response, self.config.include_score)?;
        Ok(SelectResult::Many(records.into_iter().map(without_model).collect()))
    }

    /// Like `select`, but returns the backend response untouched.
    ///
    /// The response is still checked for the expected get/search structure.
    #[instrument(skip(self, criteria))]
    pub async fn query(
        &self,
        collection: &str,
        criteria: &Criteria,
    ) -> Result<Value, AdapterError> {
        if let Some(id) = criteria.point_lookup() {
            let response = self
                .backend
                .get(self.index_name(), &document_id(collection, id))
                .await
                .map_err(|e| failed("query", collection, e))?;
            map_get_response(response.clone())?;
            return Ok(response);
        }

        let request = build_search_request(self.index_name(), collection, criteria);
        let response = self
            .backend
            .search(&request.index, request.body)
            .await
            .map_err(|e| failed("query", collection, e))?;
        map_search_response(&response, false)?;

        Ok(response)
    }

    /// Count the documents matching the criteria.
    #[instrument(skip(self, criteria))]
    pub async fn count(&self, collection: &str, criteria: &Criteria) -> Result<u64, AdapterError> {
        let response = self
            .backend
            .count(self.index_name(), build_count_body(collection, criteria))
            .await
            .map_err(|e| failed("count", collection, e))?;

        map_count_response(&response)
    }

    /// Insert a record keyed by its `id`.
    ///
    /// This is an upsert: inserting an id that already exists overwrites the
    /// given fields instead of failing.
    #[instrument(skip(self, record))]
    pub async fn insert(&self, collection: &str, record: Record) -> Result<Record, AdapterError> {
        let id = record
            .id()
            .ok_or_else(|| AdapterError::validation("insert requires a record id"))?;

        self.upsert(collection, &id, &record)
            .await
            .map_err(|e| failed("insert", collection, e))?;

        Ok(record)
    }

    /// Update a single record by id.
    ///
    /// The id comes from the record, or from `where.id` when the record has
    /// none. Criteria-based multi-record updates are not supported.
    #[instrument(skip(self, criteria, record))]
    pub async fn update(
        &self,
        collection: &str,
        criteria: &Criteria,
        mut record: Record,
    ) -> Result<Vec<Record>, AdapterError> {
        let id = match record.id() {
            Some(id) => id,
            None => {
                let id = criteria.point_lookup().cloned().ok_or_else(|| {
                    AdapterError::validation("update requires a record id or where.id")
                })?;
                record.insert(ID_FIELD, id.to_value());
                id
            }
        };

        self.upsert(collection, &id, &record)
            .await
            .map_err(|e| failed("update", collection, e))?;

        Ok(vec![record])
    }

    /// Delete the single document addressed by `where.id`.
    ///
    /// # Returns
    ///
    /// * `Ok(vec![{id}])` - The id of the deleted document
    /// * `Err(AdapterError::ValidationError)` - If the criteria carry no id
    /// * `Err(AdapterError)` - If the backend fails, including not found
    #[instrument(skip(self, criteria))]
    pub async fn destroy(
        &self,
        collection: &str,
        criteria: &Criteria,
    ) -> Result<Vec<Record>, AdapterError> {
        let id = criteria
            .point_lookup()
            .ok_or_else(|| AdapterError::validation("destroy requires where.id"))?;

        self.backend
            .delete(self.index_name(), collection, &document_id(collection, id))
            .await
            .map_err(|e| failed("destroy", collection, e))?;

        Ok(vec![Record::with_id_only(id)])
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &DocumentId,
        record: &Record,
    ) -> Result<Value, BackendError> {
        self.backend
            .update(
                self.index_name(),
                collection,
                &document_id(collection, id),
                build_upsert_body(collection, record),
            )
            .await
    }
}

/// Drop the collection tag the adapter stores alongside each record.
fn without_model(mut record: Record) -> Record {
    record.remove(MODEL_FIELD);
    record
}

fn failed(operation: &str, collection: &str, e: BackendError) -> AdapterError {
    error!(operation, collection, error = %e, "Backend call failed");
    e.into()
}
