//! Document identifiers.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::errors::CriteriaError;

/// Identifier of a single document in the search index.
///
/// ORM callers hand ids over as JSON scalars. Strings are used verbatim,
/// numbers and booleans by their JSON text, so `42` and `"42"` address the
/// same document and compare equal. The scalar the caller wrote is kept so
/// it can be echoed back unchanged.
#[derive(Debug, Clone)]
pub struct DocumentId {
    key: String,
    value: Value,
}

impl DocumentId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        let key = id.into();
        Self {
            value: Value::String(key.clone()),
            key,
        }
    }

    /// Read an id from a JSON scalar.
    ///
    /// Falsy scalars (`null`, `""`, `0`, `false`) yield `Ok(None)`: they do
    /// not address a document. Arrays and objects are rejected.
    pub fn from_value(value: &Value) -> Result<Option<Self>, CriteriaError> {
        let key = match value {
            Value::Null | Value::Bool(false) => return Ok(None),
            Value::String(s) if s.is_empty() => return Ok(None),
            Value::Number(n) if n.as_f64() == Some(0.0) => return Ok(None),
            Value::Array(_) | Value::Object(_) => return Err(CriteriaError::unsupported_id(value)),
            Value::Bool(true) => "true".to_string(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
        };

        Ok(Some(Self {
            key,
            value: value.clone(),
        }))
    }

    /// The id as sent to the backend.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// The id as the caller wrote it.
    pub fn to_value(&self) -> Value {
        self.value.clone()
    }
}

impl PartialEq for DocumentId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for DocumentId {}

impl Hash for DocumentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for DocumentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocumentId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
