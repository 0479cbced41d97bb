//! In-memory backend for unit tests.
//!
//! Records every call and keeps documents in memory so CRUD round trips can
//! be exercised without a running cluster. Query evaluation understands the
//! bodies the translator produces: `match_all`, `ids`, single-field `match`
//! and `term` clauses compared by equality, and nested `bool` queries with
//! `must`/`filter`/`should` lists.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use search_adapter_shared::DocumentId;

use crate::errors::BackendError;
use crate::interfaces::{DocumentBackend, IndexAdministration};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AdminCall {
    Exists(String),
    Create(String, Value),
    Close(String),
    PutSettings(String, Value),
    PutMapping(String, String, Value),
    Open(String),
}

impl AdminCall {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Exists(_) => "exists",
            Self::Create(..) => "create",
            Self::Close(_) => "close",
            Self::PutSettings(..) => "put_settings",
            Self::PutMapping(..) => "put_mapping",
            Self::Open(_) => "open",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DocumentCall {
    Get(String, DocumentId),
    Search(String, Value),
    Count(String, Value),
    Update(String, String, DocumentId, Value),
    Delete(String, String, DocumentId),
}

/// Mock backend for testing
pub(crate) struct MockBackend {
    /// index name -> open?
    indices: Mutex<HashMap<String, bool>>,
    documents: Mutex<HashMap<String, BTreeMap<String, Map<String, Value>>>>,
    admin_calls: Mutex<Vec<AdminCall>>,
    document_calls: Mutex<Vec<DocumentCall>>,
    failing_admin: Option<&'static str>,
    failing_documents: bool,
    search_response: Option<Value>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            indices: Mutex::new(HashMap::new()),
            documents: Mutex::new(HashMap::new()),
            admin_calls: Mutex::new(Vec::new()),
            document_calls: Mutex::new(Vec::new()),
            failing_admin: None,
            failing_documents: false,
            search_response: None,
        }
    }

    /// Start with an existing, open index.
    pub(crate) fn with_index(mut self, index: &str) -> Self {
        self.indices.get_mut().insert(index.to_string(), true);
        self
    }

    /// Fail the admin call with the given name (see `AdminCall::name`).
    pub(crate) fn failing_admin(mut self, call: &'static str) -> Self {
        self.failing_admin = Some(call);
        self
    }

    /// Fail every document call with a 500.
    pub(crate) fn failing_documents(mut self) -> Self {
        self.failing_documents = true;
        self
    }

    /// Answer every search with this body instead of evaluating it.
    pub(crate) fn with_search_response(mut self, response: Value) -> Self {
        self.search_response = Some(response);
        self
    }

    pub(crate) async fn admin_calls(&self) -> Vec<AdminCall> {
        self.admin_calls.lock().await.clone()
    }

    pub(crate) async fn document_calls(&self) -> Vec<DocumentCall> {
        self.document_calls.lock().await.clone()
    }

    pub(crate) async fn index_is_open(&self, index: &str) -> bool {
        self.indices.lock().await.get(index).copied().unwrap_or(false)
    }

    pub(crate) async fn stored(&self, index: &str, id: &str) -> Option<Map<String, Value>> {
        self.documents
            .lock()
            .await
            .get(index)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    async fn record_admin(&self, call: AdminCall) -> Result<(), BackendError> {
        let name = call.name();
        self.admin_calls.lock().await.push(call);
        if self.failing_admin == Some(name) {
            return Err(BackendError::request_failed(500, format!("mock {} failure", name)));
        }
        Ok(())
    }

    async fn record_document(&self, index: &str, call: DocumentCall) -> Result<(), BackendError> {
        self.document_calls.lock().await.push(call);
        if self.failing_documents {
            return Err(BackendError::request_failed(500, "mock failure"));
        }
        match self.indices.lock().await.get(index) {
            Some(true) | None => Ok(()),
            Some(false) => Err(BackendError::request_failed(400, "index_closed_exception")),
        }
    }

    async fn matching(&self, index: &str, query: &Value) -> Vec<(String, Map<String, Value>)> {
        self.documents
            .lock()
            .await
            .get(index)
            .map(|docs| {
                docs.iter()
                    .filter(|(id, source)| matches(query, id, source))
                    .map(|(id, source)| (id.clone(), source.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn matches(query: &Value, id: &str, source: &Map<String, Value>) -> bool {
    if query.get("match_all").is_some() {
        return true;
    }
    if let Some(values) = query["ids"]["values"].as_array() {
        return values.iter().any(|value| value.as_str() == Some(id));
    }
    for kind in ["match", "term"] {
        if let Some((field, value)) = query[kind].as_object().and_then(|m| m.iter().next()) {
            return source.get(field) == Some(value);
        }
    }
    if let Some(clauses) = query["bool"].as_object() {
        let all = |key: &str| match clauses.get(key).and_then(Value::as_array) {
            Some(list) => list.iter().all(|c| matches(c, id, source)),
            None => true,
        };
        let should = match clauses.get("should").and_then(Value::as_array) {
            Some(list) => list.iter().any(|c| matches(c, id, source)),
            None => true,
        };
        return all("must") && all("filter") && should;
    }
    false
}

#[async_trait]
impl IndexAdministration for MockBackend {
    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        self.record_admin(AdminCall::Exists(index.to_string())).await?;
        Ok(self.indices.lock().await.contains_key(index))
    }

    async fn create_index(&self, index: &str, body: Value) -> Result<(), BackendError> {
        self.record_admin(AdminCall::Create(index.to_string(), body))
            .await?;
        self.indices.lock().await.insert(index.to_string(), true);
        Ok(())
    }

    async fn close_index(&self, index: &str) -> Result<(), BackendError> {
        self.record_admin(AdminCall::Close(index.to_string())).await?;
        self.indices.lock().await.insert(index.to_string(), false);
        Ok(())
    }

    async fn put_settings(&self, index: &str, body: Value) -> Result<(), BackendError> {
        self.record_admin(AdminCall::PutSettings(index.to_string(), body))
            .await
    }

    async fn put_mapping(
        &self,
        index: &str,
        type_name: &str,
        body: Value,
    ) -> Result<(), BackendError> {
        self.record_admin(AdminCall::PutMapping(
            index.to_string(),
            type_name.to_string(),
            body,
        ))
        .await
    }

    async fn open_index(&self, index: &str) -> Result<(), BackendError> {
        self.record_admin(AdminCall::Open(index.to_string())).await?;
        self.indices.lock().await.insert(index.to_string(), true);
        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for MockBackend {
    async fn get(&self, index: &str, id: &DocumentId) -> Result<Value, BackendError> {
        self.record_document(index, DocumentCall::Get(index.to_string(), id.clone()))
            .await?;
        let source = self
            .stored(index, id.as_str())
            .await
            .ok_or_else(|| BackendError::not_found(id.as_str()))?;

        Ok(json!({
            "_index": index,
            "_id": id.as_str(),
            "found": true,
            "_source": source
        }))
    }

    async fn search(&self, index: &str, body: Value) -> Result<Value, BackendError> {
        self.record_document(index, DocumentCall::Search(index.to_string(), body.clone()))
            .await?;
        if let Some(response) = &self.search_response {
            return Ok(response.clone());
        }

        let found = self.matching(index, &body["query"]).await;
        let total = found.len();
        let from = body["from"].as_u64().unwrap_or(0) as usize;
        let size = body["size"].as_u64().map(|s| s as usize).unwrap_or(10);
        let hits: Vec<Value> = found
            .into_iter()
            .skip(from)
            .take(size)
            .map(|(id, source)| {
                json!({ "_index": index, "_id": id, "_score": 1.0, "_source": source })
            })
            .collect();

        Ok(json!({
            "took": 1,
            "hits": {
                "total": { "value": total, "relation": "eq" },
                "hits": hits
            }
        }))
    }

    async fn count(&self, index: &str, body: Value) -> Result<Value, BackendError> {
        self.record_document(index, DocumentCall::Count(index.to_string(), body.clone()))
            .await?;
        let count = self.matching(index, &body["query"]).await.len();
        Ok(json!({ "count": count }))
    }

    async fn update(
        &self,
        index: &str,
        type_name: &str,
        id: &DocumentId,
        body: Value,
    ) -> Result<Value, BackendError> {
        self.record_document(
            index,
            DocumentCall::Update(
                index.to_string(),
                type_name.to_string(),
                id.clone(),
                body.clone(),
            ),
        )
        .await?;

        let doc = body["doc"].as_object().cloned().unwrap_or_default();
        let upsert = body["doc_as_upsert"].as_bool().unwrap_or(false);

        let mut documents = self.documents.lock().await;
        let docs = documents.entry(index.to_string()).or_default();
        let result = match docs.get_mut(id.as_str()) {
            Some(existing) => {
                existing.extend(doc);
                "updated"
            }
            None if upsert => {
                docs.insert(id.as_str().to_string(), doc);
                "created"
            }
            None => return Err(BackendError::not_found(id.as_str())),
        };

        Ok(json!({ "_index": index, "_id": id.as_str(), "result": result }))
    }

    async fn delete(
        &self,
        index: &str,
        type_name: &str,
        id: &DocumentId,
    ) -> Result<Value, BackendError> {
        self.record_document(
            index,
            DocumentCall::Delete(index.to_string(), type_name.to_string(), id.clone()),
        )
        .await?;

        let mut documents = self.documents.lock().await;
        documents
            .get_mut(index)
            .and_then(|docs| docs.remove(id.as_str()))
            .ok_or_else(|| BackendError::not_found(id.as_str()))?;

        Ok(json!({ "_index": index, "_id": id.as_str(), "result": "deleted" }))
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        Ok(!self.failing_documents)
    }
}
