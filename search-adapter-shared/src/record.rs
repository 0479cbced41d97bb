//! ORM-shaped records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CriteriaError;
use crate::id::DocumentId;

/// Field holding the record's identifier.
pub const ID_FIELD: &str = "id";

/// Field carrying the relevance score of a ranked search hit.
pub const SCORE_FIELD: &str = "_score";

/// A single record: `{id, ...fields}`, plus `_score` when it came from a
/// ranked search.
///
/// Records are plain values built fresh for every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// A record carrying nothing but its id.
    pub fn with_id_only(id: &DocumentId) -> Self {
        Self::new().with(ID_FIELD, id.to_value())
    }

    /// Set a field, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// The record's id, if it has a usable one.
    pub fn id(&self) -> Option<DocumentId> {
        self.0
            .get(ID_FIELD)
            .and_then(|id| DocumentId::from_value(id).ok().flatten())
    }

    /// Look up a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Relevance score, when annotated.
    pub fn score(&self) -> Option<f64> {
        self.0.get(SCORE_FIELD).and_then(Value::as_f64)
    }

    /// Annotate the record with a relevance score.
    pub fn set_score(&mut self, score: f64) {
        self.0.insert(SCORE_FIELD.to_string(), Value::from(score));
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = CriteriaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CriteriaError::RecordNotObject(other.to_string())),
        }
    }
}
