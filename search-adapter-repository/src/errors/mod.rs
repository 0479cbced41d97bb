//! Error types for the search adapter repository.

mod adapter_error;
mod backend_error;
mod provisioning_error;

pub use adapter_error::AdapterError;
pub use backend_error::BackendError;
pub use provisioning_error::{ProvisionStep, ProvisioningError};
