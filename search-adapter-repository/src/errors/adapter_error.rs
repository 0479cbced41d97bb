//! Adapter error types.
//!
//! This module defines the errors returned by the CRUD facade.

use search_adapter_shared::CriteriaError;
use thiserror::Error;

use super::BackendError;

/// Errors returned by adapter operations.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// The backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The backend answered without the expected structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request cannot be served as given (e.g. missing id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The ORM criteria or record payload could not be read.
    #[error("Invalid criteria: {0}")]
    Criteria(#[from] CriteriaError),
}

impl AdapterError {
    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether the error means the addressed document is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Backend(e) if e.is_not_found())
    }
}
