//! # Search Adapter
//!
//! Main library for the ORM search adapter binary.
//!
//! This crate provides configuration loading and dependency wiring for
//! running adapter operations from the command line.

pub mod config;

pub use config::{load_config, Dependencies};

use thiserror::Error;

use search_adapter_repository::ProvisioningError;

/// Errors that can occur during adapter initialization or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Index provisioning error.
    #[error("Provisioning error: {0}")]
    ProvisioningError(#[from] ProvisioningError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
