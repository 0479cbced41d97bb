//! ORM query criteria.
//!
//! A `Criteria` is what an ORM hands the adapter for `select`, `count`,
//! `update` and `destroy`: an optional `where` predicate, an ordered sort
//! description and optional paging. It deserializes from the ORM's JSON
//! shape:
//!
//! ```json
//! { "where": { "or": [{ "name": "a" }, { "age": 3 }] },
//!   "sort": { "age": -1, "_script": { "type": "number", "script": "..." } },
//!   "limit": 10,
//!   "skip": 20 }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::CriteriaError;
use crate::id::DocumentId;

/// Sort key whose value is passed through as a raw script sort.
pub const SCRIPT_SORT_KEY: &str = "_script";

/// The `where` part of a criteria object.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `{id: scalar}`: fetch a single document directly.
    Id(DocumentId),
    /// `{or: [...]}`: match any of the listed single-field clauses.
    ///
    /// Only the first key/value pair of each element is honoured.
    Or(Vec<Map<String, Value>>),
    /// Flat field → value equality.
    Fields(Map<String, Value>),
}

impl Predicate {
    /// Classify a raw `where` object.
    ///
    /// A truthy `id` wins over everything else, then `or`; sibling keys of
    /// either are ignored. A falsy `id` is kept as an ordinary field.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, CriteriaError> {
        if let Some(id) = map.get("id") {
            if let Some(id) = DocumentId::from_value(id)? {
                return Ok(Self::Id(id));
            }
        }

        if let Some(or) = map.get("or") {
            let elements = or
                .as_array()
                .ok_or_else(|| CriteriaError::invalid_or(format!("expected a list, got {}", or)))?;

            let clauses = elements
                .iter()
                .map(|element| {
                    element.as_object().cloned().ok_or_else(|| {
                        CriteriaError::invalid_or(format!("expected an object, got {}", element))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            return Ok(Self::Or(clauses));
        }

        Ok(Self::Fields(map))
    }
}

/// Direction of a field sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Read a direction from the ORM's sort value.
    ///
    /// Positive numbers sort ascending, including numeric strings such as
    /// `"1"`. The strings `asc`/`desc` are taken literally; everything else
    /// sorts descending.
    pub fn from_value(value: &Value) -> Self {
        let positive = |n: f64| if n > 0.0 { Self::Asc } else { Self::Desc };
        match value {
            Value::Number(n) => n.as_f64().map_or(Self::Desc, positive),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) => positive(n),
                Err(_) if s.eq_ignore_ascii_case("asc") => Self::Asc,
                Err(_) => Self::Desc,
            },
            _ => Self::Desc,
        }
    }

    /// The backend's name for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One entry of the sort description, in caller order.
#[derive(Debug, Clone, PartialEq)]
pub enum SortClause {
    /// Sort on a document field.
    Field {
        field: String,
        direction: SortDirection,
    },
    /// Caller-supplied script sort, passed through unvalidated.
    Script(Value),
}

/// Query criteria as issued by the ORM.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawCriteria")]
pub struct Criteria {
    /// The `where` predicate, if any.
    pub predicate: Option<Predicate>,
    /// Sort clauses in the order the caller listed them.
    pub sort: Vec<SortClause>,
    /// Maximum number of hits. Zero is treated as unset.
    pub limit: Option<u64>,
    /// Number of hits to skip. Zero is treated as unset.
    pub skip: Option<u64>,
}

impl Criteria {
    /// Empty criteria: every document, backend default ordering and paging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria addressing a single document by id.
    pub fn by_id(id: impl Into<DocumentId>) -> Self {
        Self::new().with_predicate(Predicate::Id(id.into()))
    }

    /// Set the `where` predicate.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Append a field sort.
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortClause::Field {
            field: field.into(),
            direction,
        });
        self
    }

    /// Append a raw script sort.
    pub fn sort_by_script(mut self, script: Value) -> Self {
        self.sort.push(SortClause::Script(script));
        self
    }

    /// Set the limit. Zero clears it.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Set the skip. Zero clears it.
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = (skip > 0).then_some(skip);
        self
    }

    /// The id addressed by a point lookup, if this is one.
    pub fn point_lookup(&self) -> Option<&DocumentId> {
        match &self.predicate {
            Some(Predicate::Id(id)) => Some(id),
            _ => None,
        }
    }
}

impl TryFrom<Value> for Criteria {
    type Error = CriteriaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw: RawCriteria = serde_json::from_value(value)
            .map_err(|e| CriteriaError::malformed(e.to_string()))?;
        raw.try_into()
    }
}

/// Wire shape of the criteria before classification.
#[derive(Debug, Deserialize)]
struct RawCriteria {
    #[serde(rename = "where", default)]
    where_clause: Option<Map<String, Value>>,
    #[serde(default)]
    sort: Option<Map<String, Value>>,
    #[serde(default)]
    limit: Option<Value>,
    #[serde(default)]
    skip: Option<Value>,
}

impl TryFrom<RawCriteria> for Criteria {
    type Error = CriteriaError;

    fn try_from(raw: RawCriteria) -> Result<Self, Self::Error> {
        let predicate = raw.where_clause.map(Predicate::from_map).transpose()?;

        let sort = raw
            .sort
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                if key == SCRIPT_SORT_KEY {
                    SortClause::Script(value)
                } else {
                    SortClause::Field {
                        direction: SortDirection::from_value(&value),
                        field: key,
                    }
                }
            })
            .collect();

        Ok(Self {
            predicate,
            sort,
            limit: paging("limit", raw.limit)?,
            skip: paging("skip", raw.skip)?,
        })
    }
}

/// Read `limit`/`skip`, dropping zero and null like any other unset value.
fn paging(field: &'static str, value: Option<Value>) -> Result<Option<u64>, CriteriaError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|n| (n > 0).then_some(n))
            .ok_or_else(|| CriteriaError::invalid_paging(field, &value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Criteria {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_id_short_circuits_other_fields() {
        let criteria = parse(json!({
            "where": { "id": "42", "name": "ignored", "or": [{ "a": 1 }] },
            "limit": 5
        }));

        assert_eq!(criteria.point_lookup(), Some(&DocumentId::new("42")));
        assert_eq!(criteria.limit, Some(5));
    }

    #[test]
    fn test_numeric_id() {
        let criteria = parse(json!({ "where": { "id": 7 } }));
        assert_eq!(criteria.point_lookup(), Some(&DocumentId::new("7")));
    }

    #[test]
    fn test_falsy_id_stays_a_field() {
        let criteria = parse(json!({ "where": { "id": 0, "name": "a" } }));

        assert!(criteria.point_lookup().is_none());
        match criteria.predicate {
            Some(Predicate::Fields(fields)) => {
                assert_eq!(fields.get("id"), Some(&json!(0)));
                assert_eq!(fields.get("name"), Some(&json!("a")));
            }
            other => panic!("expected fields predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_or_predicate() {
        let criteria = parse(json!({ "where": { "or": [{ "a": 1 }, { "b": 2 }] } }));

        match criteria.predicate {
            Some(Predicate::Or(clauses)) => {
                assert_eq!(clauses.len(), 2);
                assert_eq!(clauses[0].get("a"), Some(&json!(1)));
                assert_eq!(clauses[1].get("b"), Some(&json!(2)));
            }
            other => panic!("expected or predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_or_must_be_list_of_objects() {
        let err = Criteria::try_from(json!({ "where": { "or": { "a": 1 } } })).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidOr(_)));

        let err = Criteria::try_from(json!({ "where": { "or": [1, 2] } })).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidOr(_)));
    }

    #[test]
    fn test_null_where() {
        let criteria = parse(json!({ "where": null }));
        assert!(criteria.predicate.is_none());
    }

    #[test]
    fn test_sort_order_and_directions() {
        let criteria = parse(json!({
            "sort": {
                "name": 1,
                "_script": { "type": "number", "script": "doc['x'].value" },
                "age": -1,
                "rank": "ASC"
            }
        }));

        assert_eq!(
            criteria.sort,
            vec![
                SortClause::Field {
                    field: "name".to_string(),
                    direction: SortDirection::Asc
                },
                SortClause::Script(json!({ "type": "number", "script": "doc['x'].value" })),
                SortClause::Field {
                    field: "age".to_string(),
                    direction: SortDirection::Desc
                },
                SortClause::Field {
                    field: "rank".to_string(),
                    direction: SortDirection::Asc
                },
            ]
        );
    }

    #[test]
    fn test_numeric_string_sort_directions() {
        assert_eq!(SortDirection::from_value(&json!("1")), SortDirection::Asc);
        assert_eq!(SortDirection::from_value(&json!(" 2 ")), SortDirection::Asc);
        assert_eq!(SortDirection::from_value(&json!("-1")), SortDirection::Desc);
        assert_eq!(SortDirection::from_value(&json!("0")), SortDirection::Desc);
        assert_eq!(SortDirection::from_value(&json!("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_value(&json!(null)), SortDirection::Desc);
    }

    #[test]
    fn test_zero_paging_is_unset() {
        let criteria = parse(json!({ "limit": 0, "skip": 0 }));
        assert_eq!(criteria.limit, None);
        assert_eq!(criteria.skip, None);

        let criteria = Criteria::new().with_limit(0).with_skip(3);
        assert_eq!(criteria.limit, None);
        assert_eq!(criteria.skip, Some(3));
    }

    #[test]
    fn test_negative_limit_rejected() {
        let err = Criteria::try_from(json!({ "limit": -1 })).unwrap_err();
        assert_eq!(err, CriteriaError::invalid_paging("limit", -1));
    }

    #[test]
    fn test_composite_id_rejected() {
        let err = Criteria::try_from(json!({ "where": { "id": [1, 2] } })).unwrap_err();
        assert!(matches!(err, CriteriaError::UnsupportedId(_)));
    }
}
