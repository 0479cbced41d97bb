//! Backend error types.
//!
//! This module defines the errors a search backend reports for a single call.

use thiserror::Error;

/// Errors that can occur while talking to the search backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Failed to build the transport or reach the backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The addressed document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The response body could not be read as JSON.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl BackendError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a failed request error.
    pub fn request_failed(status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            body: body.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether the error means the addressed document is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
