//! Request and response types for adapter operations.

use serde_json::Value;

use search_adapter_shared::Record;

/// A search request derived from ORM criteria.
///
/// Built deterministically by the query translator; carries no hidden state.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// The index to search.
    pub index: String,
    /// The backend-native body (`query`, `size`, `from`, `sort`).
    pub body: Value,
}

/// Result of a `select`.
///
/// A point lookup by id yields exactly one record; any other criteria yield
/// a list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectResult {
    /// The document fetched directly by id.
    One(Record),
    /// The hits of a search, in backend order.
    Many(Vec<Record>),
}

impl SelectResult {
    /// Flatten into a list of records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::One(record) => vec![record],
            Self::Many(records) => records,
        }
    }

    /// Serialize into the ORM's JSON shape: an object or a list of objects.
    pub fn into_value(self) -> Value {
        match self {
            Self::One(record) => record.into_value(),
            Self::Many(records) => {
                Value::Array(records.into_iter().map(Record::into_value).collect())
            }
        }
    }
}

/// What provisioning did to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The index did not exist and was created.
    Created,
    /// The index existed; settings and mappings were re-applied.
    Updated,
}
