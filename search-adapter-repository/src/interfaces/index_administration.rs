//! Index administration trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::BackendError;

/// Lifecycle operations on a search index.
///
/// Used once per adapter lifetime by the index provisioner.
#[async_trait]
pub trait IndexAdministration: Send + Sync {
    /// Check whether the index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, BackendError>;

    /// Create the index with the given `{settings, mappings}` body.
    async fn create_index(&self, index: &str, body: Value) -> Result<(), BackendError>;

    /// Close the index. Document operations fail until it is reopened.
    async fn close_index(&self, index: &str) -> Result<(), BackendError>;

    /// Apply index settings (analysis) to a closed index.
    async fn put_settings(&self, index: &str, body: Value) -> Result<(), BackendError>;

    /// Apply the mapping of one document type.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `type_name` - The configured type the mapping belongs to
    /// * `body` - The mapping definition
    async fn put_mapping(&self, index: &str, type_name: &str, body: Value)
        -> Result<(), BackendError>;

    /// Reopen a closed index.
    async fn open_index(&self, index: &str) -> Result<(), BackendError>;
}
