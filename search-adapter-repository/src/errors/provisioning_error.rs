//! Provisioning error types.
//!
//! Index provisioning runs once at startup; any of these is fatal for the
//! adapter and is never retried.

use std::fmt;

use thiserror::Error;

use super::BackendError;

/// A step of the index provisioning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    ExistsCheck,
    Create,
    Close,
    PutSettings,
    PutMapping,
    Open,
}

impl ProvisionStep {
    /// Whether a failure at this step leaves the index closed.
    pub fn leaves_index_closed(&self) -> bool {
        matches!(self, Self::PutSettings | Self::PutMapping | Self::Open)
    }
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExistsCheck => "exists check",
            Self::Create => "create",
            Self::Close => "close",
            Self::PutSettings => "put settings",
            Self::PutMapping => "put mapping",
            Self::Open => "open",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while provisioning the index.
#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    /// A lifecycle call on the index failed.
    #[error("Index {index}: {step} failed: {source}")]
    StepFailed {
        index: String,
        step: ProvisionStep,
        #[source]
        source: BackendError,
    },

    /// Applying the mapping of one configured type failed.
    #[error("Index {index}: put mapping for type {type_name} failed: {source}")]
    MappingFailed {
        index: String,
        type_name: String,
        #[source]
        source: BackendError,
    },
}

impl ProvisioningError {
    /// Create a step failure.
    pub fn step(index: impl Into<String>, step: ProvisionStep, source: BackendError) -> Self {
        Self::StepFailed {
            index: index.into(),
            step,
            source,
        }
    }

    /// Create a mapping failure for a single type.
    pub fn mapping(
        index: impl Into<String>,
        type_name: impl Into<String>,
        source: BackendError,
    ) -> Self {
        Self::MappingFailed {
            index: index.into(),
            type_name: type_name.into(),
            source,
        }
    }

    /// The step that failed.
    pub fn failed_step(&self) -> ProvisionStep {
        match self {
            Self::StepFailed { step, .. } => *step,
            Self::MappingFailed { .. } => ProvisionStep::PutMapping,
        }
    }

    /// Whether the failure left the index closed.
    ///
    /// Close → settings → mappings → open is not transactional and nothing is
    /// rolled back.
    pub fn index_left_closed(&self) -> bool {
        self.failed_step().leaves_index_closed()
    }
}
