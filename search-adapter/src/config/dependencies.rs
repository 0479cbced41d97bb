//! Dependency initialization and wiring for the search adapter.

use std::sync::Arc;
use tracing::info;

use crate::AppError;
use search_adapter_repository::{AdapterConfig, DocumentBackend, OpenSearchClient, SearchAdapter};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The adapter, with its index provisioned.
    pub adapter: SearchAdapter,
}

impl Dependencies {
    /// Connect to the backend, verify it and provision the index.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the backend is unreachable or provisioning fails
    pub async fn new(config: AdapterConfig) -> Result<Self, AppError> {
        info!(
            host = %config.host,
            index = %config.index.name,
            shards = config.index.number_of_shards,
            replicas = config.index.number_of_replicas,
            "Initializing dependencies"
        );

        let client = OpenSearchClient::from_config(&config)
            .map_err(|e| AppError::config(format!("Failed to create search client: {}", e)))?;

        // Verify the backend is reachable
        let healthy = client
            .health_check()
            .await
            .map_err(|e| AppError::config(format!("Search backend health check failed: {}", e)))?;

        if !healthy {
            return Err(AppError::config("Search cluster is unhealthy"));
        }

        info!("Search backend connection verified");

        let adapter = SearchAdapter::initialize(Arc::new(client), config).await?;

        Ok(Self { adapter })
    }
}
