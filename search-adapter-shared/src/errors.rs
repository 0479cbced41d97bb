//! Errors raised while reading ORM-shaped input.

use thiserror::Error;

/// Errors that can occur while interpreting criteria or record payloads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CriteriaError {
    /// `where.id` was an array or an object.
    #[error("Unsupported id value: {0}")]
    UnsupportedId(String),

    /// `where.or` was not a list of objects.
    #[error("Invalid or clause: {0}")]
    InvalidOr(String),

    /// `limit` or `skip` was not a non-negative integer.
    #[error("Invalid {field}: {value}")]
    InvalidPaging { field: &'static str, value: String },

    /// The criteria object itself could not be read.
    #[error("Malformed criteria: {0}")]
    Malformed(String),

    /// A record payload was not a JSON object.
    #[error("Record must be a JSON object, got: {0}")]
    RecordNotObject(String),
}

impl CriteriaError {
    /// Create an unsupported id error.
    pub fn unsupported_id(value: impl ToString) -> Self {
        Self::UnsupportedId(value.to_string())
    }

    /// Create an invalid or clause error.
    pub fn invalid_or(msg: impl Into<String>) -> Self {
        Self::InvalidOr(msg.into())
    }

    /// Create a malformed criteria error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create an invalid paging error.
    pub fn invalid_paging(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidPaging {
            field,
            value: value.to_string(),
        }
    }
}
