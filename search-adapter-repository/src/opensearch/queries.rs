//! Query builders.
//!
//! This module translates ORM criteria into Elasticsearch/OpenSearch request
//! bodies. Translation is pure: the same criteria always yield the same body.
//!
//! Every collection shares the one configured index. Documents are stored
//! under a collection-prefixed id with the collection name in `model`, and
//! searches and counts are filtered on that field.

use serde_json::{json, Map, Value};

use search_adapter_shared::{Criteria, DocumentId, Predicate, Record, SortClause, SCRIPT_SORT_KEY};

use crate::types::SearchRequest;

/// Field holding the name of the collection a document belongs to.
pub const MODEL_FIELD: &str = "model";

/// Build a search body from ORM criteria.
///
/// The query builder handles:
/// - `where.id` point lookups, which ignore sort and paging entirely
/// - flat equality predicates as `match` clauses that must all hold
/// - `or` predicates as `match` clauses of which one must hold
/// - `limit`/`skip` as `size`/`from` (zero is treated as unset)
/// - field and `_script` sorts, in caller order
pub fn build_query(criteria: &Criteria) -> Value {
    if let Some(id) = criteria.point_lookup() {
        return build_id_query(id);
    }

    let mut body = Map::new();
    body.insert(
        "query".to_string(),
        build_predicate_query(criteria.predicate.as_ref()),
    );

    if let Some(limit) = criteria.limit {
        body.insert("size".to_string(), json!(limit));
    }
    if let Some(skip) = criteria.skip {
        body.insert("from".to_string(), json!(skip));
    }
    if !criteria.sort.is_empty() {
        body.insert("sort".to_string(), build_sort(&criteria.sort));
    }

    Value::Object(body)
}

/// Build a search request against the given index, restricted to one
/// collection.
pub fn build_search_request(index: &str, collection: &str, criteria: &Criteria) -> SearchRequest {
    let mut body = build_query(criteria);
    let query = body["query"].take();
    body["query"] = scope_to_collection(query, collection);

    SearchRequest {
        index: index.to_string(),
        body,
    }
}

/// Build a count body: the collection-scoped query clause only.
///
/// The count endpoint rejects `size`, `from` and `sort`.
pub fn build_count_body(collection: &str, criteria: &Criteria) -> Value {
    let query = build_query(criteria)
        .get("query")
        .cloned()
        .unwrap_or_else(match_all);

    json!({ "query": scope_to_collection(query, collection) })
}

/// Build the upsert body for a record of the given collection.
///
/// Inserts and updates send the same shape: the record tagged with its
/// collection, created when the id is new.
pub fn build_upsert_body(collection: &str, record: &Record) -> Value {
    let mut doc = record.clone();
    doc.insert(MODEL_FIELD, Value::from(collection));

    json!({
        "doc": doc,
        "doc_as_upsert": true
    })
}

/// Generate the backend document id for a record id within a collection.
///
/// Uses format: `{collection}:{id}` so equal ids in different collections
/// address different documents.
pub fn document_id(collection: &str, id: &DocumentId) -> DocumentId {
    DocumentId::new(format!("{}:{}", collection, id.as_str()))
}

fn scope_to_collection(query: Value, collection: &str) -> Value {
    json!({
        "bool": {
            "must": [query],
            "filter": [{ "term": { MODEL_FIELD: collection } }]
        }
    })
}

/// Build a query for a direct id lookup.
fn build_id_query(id: &DocumentId) -> Value {
    json!({
        "query": {
            "ids": { "values": [id.as_str()] }
        }
    })
}

fn build_predicate_query(predicate: Option<&Predicate>) -> Value {
    match predicate {
        None => match_all(),
        Some(Predicate::Id(id)) => build_id_query(id)["query"].clone(),
        Some(Predicate::Fields(fields)) if fields.is_empty() => match_all(),
        Some(Predicate::Fields(fields)) => build_fields_query(fields),
        Some(Predicate::Or(clauses)) => build_or_query(clauses),
    }
}

/// Every listed field must match its value.
fn build_fields_query(fields: &Map<String, Value>) -> Value {
    let must: Vec<Value> = fields
        .iter()
        .map(|(field, value)| match_clause(field, value))
        .collect();

    json!({ "bool": { "must": must } })
}

/// At least one of the `or` elements must match.
///
/// Each element contributes its first key/value pair only; further keys are
/// dropped and empty elements contribute nothing.
fn build_or_query(clauses: &[Map<String, Value>]) -> Value {
    let should: Vec<Value> = clauses
        .iter()
        .filter_map(|clause| clause.iter().next())
        .map(|(field, value)| match_clause(field, value))
        .collect();

    json!({
        "bool": {
            "should": should,
            "minimum_should_match": 1
        }
    })
}

fn build_sort(sort: &[SortClause]) -> Value {
    let clauses: Vec<Value> = sort
        .iter()
        .map(|clause| match clause {
            SortClause::Script(script) => json!({ SCRIPT_SORT_KEY: script }),
            SortClause::Field { field, direction } => {
                json!({ field.as_str(): { "order": direction.as_str() } })
            }
        })
        .collect();

    Value::Array(clauses)
}

fn match_clause(field: &str, value: &Value) -> Value {
    json!({ "match": { field: value } })
}

fn match_all() -> Value {
    json!({ "match_all": {} })
}
