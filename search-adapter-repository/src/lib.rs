//! # Search Adapter Repository
//!
//! This crate translates ORM criteria into Elasticsearch/OpenSearch requests
//! and maps the responses back into records. It includes definitions for
//! errors, the backend interfaces, the index provisioner, the CRUD facade
//! and a concrete implementation over the OpenSearch client.

pub mod adapter;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod provisioner;
pub mod types;

#[cfg(test)]
mod testing;

pub use adapter::SearchAdapter;
pub use config::{AdapterConfig, IndexSettings};
pub use errors::{AdapterError, BackendError, ProvisionStep, ProvisioningError};
pub use interfaces::{DocumentBackend, IndexAdministration};
pub use opensearch::OpenSearchClient;
pub use provisioner::IndexProvisioner;
pub use types::{ProvisionOutcome, SearchRequest, SelectResult};
