//! Response mapping.
//!
//! Normalizes the backend's get, search and count responses into records
//! and counts. Missing structure is reported as a malformed response rather
//! than papered over.

use serde_json::Value;

use search_adapter_shared::{DocumentId, Record, ID_FIELD};

use crate::errors::{AdapterError, BackendError};

/// Map a single-document get response to a record.
///
/// When `_source` carries no `id`, the document `_id` is copied in so the
/// record stays addressable.
pub fn map_get_response(response: Value) -> Result<Record, AdapterError> {
    if response.get("found").and_then(Value::as_bool) == Some(false) {
        let id = response
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(BackendError::not_found(id).into());
    }

    let doc_id = response.get("_id").cloned();
    let mut record = source_record(&response)
        .ok_or_else(|| AdapterError::malformed("get response has no _source object"))?;

    if record.get(ID_FIELD).is_none() {
        if let Some(doc_id) = doc_id {
            record.insert(ID_FIELD, doc_id);
        }
    }

    Ok(record)
}

/// Map a search response to records in hit order.
///
/// Hits are annotated with `_score` when `include_score` is set and the
/// backend scored them (scores are `null` when sorting on a field).
pub fn map_search_response(
    response: &Value,
    include_score: bool,
) -> Result<Vec<Record>, AdapterError> {
    let hits = response
        .get("hits")
        .and_then(|hits| hits.get("hits"))
        .and_then(Value::as_array)
        .ok_or_else(|| AdapterError::malformed("search response has no hits.hits list"))?;

    hits.iter()
        .map(|hit| parse_hit(hit, include_score))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| AdapterError::malformed("search hit has no _source object"))
}

/// Map a count response to the number of matching documents.
pub fn map_count_response(response: &Value) -> Result<u64, AdapterError> {
    response
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| AdapterError::malformed("count response has no count"))
}

/// Parse a single search hit into a record.
pub(crate) fn parse_hit(hit: &Value, include_score: bool) -> Option<Record> {
    let mut record = source_record(hit)?;

    if include_score {
        if let Some(score) = hit.get("_score").and_then(Value::as_f64) {
            record.set_score(score);
        }
    }

    if record.get(ID_FIELD).is_none() {
        if let Some(doc_id) = hit.get("_id").and_then(Value::as_str) {
            record.insert(ID_FIELD, DocumentId::new(doc_id).to_value());
        }
    }

    Some(record)
}

fn source_record(document: &Value) -> Option<Record> {
    document
        .get("_source")
        .and_then(Value::as_object)
        .cloned()
        .map(Record::from)
}
