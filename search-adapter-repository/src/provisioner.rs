//! Index provisioning.
//!
//! Runs once per adapter lifetime, before any document operation:
//!
//! - index absent: create it with shards, replicas, analysis and mappings
//! - index present: close it, apply analysis settings, apply each type's
//!   mapping, reopen it
//!
//! The update path is not transactional. A failure after the close leaves
//! the index closed; nothing is rolled back and the caller has to repair the
//! index before serving traffic.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::config::IndexSettings;
use crate::errors::{ProvisionStep, ProvisioningError};
use crate::interfaces::IndexAdministration;
use crate::opensearch::index_config::{analysis_settings_body, create_index_body};
use crate::types::ProvisionOutcome;

/// Ensures the configured index exists with current settings and mappings.
pub struct IndexProvisioner {
    admin: Arc<dyn IndexAdministration>,
    settings: IndexSettings,
}

impl IndexProvisioner {
    /// Create a provisioner for the given index settings.
    pub fn new(admin: Arc<dyn IndexAdministration>, settings: IndexSettings) -> Self {
        Self { admin, settings }
    }

    /// Name of the provisioned index.
    pub fn index_name(&self) -> &str {
        &self.settings.name
    }

    /// Create the index, or bring an existing one up to date.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisionOutcome::Created)` - The index did not exist and was created
    /// * `Ok(ProvisionOutcome::Updated)` - The index existed and was reconfigured
    /// * `Err(ProvisioningError)` - A step failed; see `index_left_closed`
    #[instrument(skip(self), fields(index = %self.settings.name))]
    pub async fn ensure_index(&self) -> Result<ProvisionOutcome, ProvisioningError> {
        let index = self.settings.name.as_str();

        let exists = self
            .admin
            .index_exists(index)
            .await
            .map_err(|e| ProvisioningError::step(index, ProvisionStep::ExistsCheck, e))?;

        if !exists {
            self.create().await?;
            return Ok(ProvisionOutcome::Created);
        }

        if let Err(e) = self.update_existing().await {
            if e.index_left_closed() {
                warn!(
                    index,
                    error = %e,
                    "Index update failed after close; index may remain closed"
                );
            } else {
                error!(index, error = %e, "Index update failed");
            }
            return Err(e);
        }

        Ok(ProvisionOutcome::Updated)
    }

    async fn create(&self) -> Result<(), ProvisioningError> {
        let index = self.settings.name.as_str();
        info!(
            index,
            shards = self.settings.number_of_shards,
            replicas = self.settings.number_of_replicas,
            "Creating index"
        );

        self.admin
            .create_index(index, create_index_body(&self.settings))
            .await
            .map_err(|e| {
                error!(index, error = %e, "Index creation failed");
                ProvisioningError::step(index, ProvisionStep::Create, e)
            })
    }

    async fn update_existing(&self) -> Result<(), ProvisioningError> {
        let index = self.settings.name.as_str();
        info!(index, "Index exists; updating settings and mappings");

        self.admin
            .close_index(index)
            .await
            .map_err(|e| ProvisioningError::step(index, ProvisionStep::Close, e))?;

        match analysis_settings_body(&self.settings) {
            Some(body) => self
                .admin
                .put_settings(index, body)
                .await
                .map_err(|e| ProvisioningError::step(index, ProvisionStep::PutSettings, e))?,
            None => debug!(index, "No analysis configured; skipping settings update"),
        }

        for (type_name, mapping) in &self.settings.mappings {
            self.admin
                .put_mapping(index, type_name, mapping.clone())
                .await
                .map_err(|e| ProvisioningError::mapping(index, type_name.as_str(), e))?;
        }

        self.admin
            .open_index(index)
            .await
            .map_err(|e| ProvisioningError::step(index, ProvisionStep::Open, e))?;

        info!(index, types = self.settings.mappings.len(), "Index reopened");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{AdminCall, MockBackend};
    use serde_json::json;

    fn settings() -> IndexSettings {
        IndexSettings::new("orm")
            .with_analysis(json!({ "analyzer": { "folding": { "tokenizer": "standard" } } }))
            .with_mapping("user", json!({ "properties": { "name": { "type": "text" } } }))
            .with_mapping("pet", json!({ "properties": { "kind": { "type": "keyword" } } }))
    }

    #[tokio::test]
    async fn test_creates_missing_index() {
        let backend = Arc::new(MockBackend::new());
        let provisioner = IndexProvisioner::new(backend.clone(), settings());

        let outcome = provisioner.ensure_index().await.unwrap();

        assert_eq!(outcome, ProvisionOutcome::Created);
        let calls = backend.admin_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], AdminCall::Exists("orm".to_string()));
        match &calls[1] {
            AdminCall::Create(index, body) => {
                assert_eq!(index, "orm");
                assert_eq!(body["settings"]["number_of_shards"], 2);
                assert_eq!(body["settings"]["number_of_replicas"], 1);
                assert!(body["settings"]["analysis"].is_object());
                assert!(body["mappings"]["properties"]["name"].is_object());
                assert!(body["mappings"]["properties"]["kind"].is_object());
            }
            other => panic!("expected create call, got {:?}", other),
        }
        assert!(backend.index_is_open("orm").await);
    }

    #[tokio::test]
    async fn test_updates_existing_index_in_order() {
        let backend = Arc::new(MockBackend::new().with_index("orm"));
        let provisioner = IndexProvisioner::new(backend.clone(), settings());

        let outcome = provisioner.ensure_index().await.unwrap();

        assert_eq!(outcome, ProvisionOutcome::Updated);
        let calls = backend.admin_calls().await;
        let names: Vec<&str> = calls.iter().map(AdminCall::name).collect();
        assert_eq!(
            names,
            vec!["exists", "close", "put_settings", "put_mapping", "put_mapping", "open"]
        );
        assert_eq!(
            calls[3],
            AdminCall::PutMapping(
                "orm".to_string(),
                "user".to_string(),
                json!({ "properties": { "name": { "type": "text" } } })
            )
        );
        assert!(matches!(&calls[4], AdminCall::PutMapping(_, type_name, _) if type_name == "pet"));
        assert!(backend.index_is_open("orm").await);
    }

    #[tokio::test]
    async fn test_update_without_analysis_skips_settings() {
        let backend = Arc::new(MockBackend::new().with_index("orm"));
        let provisioner = IndexProvisioner::new(backend.clone(), IndexSettings::new("orm"));

        provisioner.ensure_index().await.unwrap();

        let calls = backend.admin_calls().await;
        let names: Vec<&str> = calls.iter().map(AdminCall::name).collect();
        assert_eq!(names, vec!["exists", "close", "open"]);
    }

    #[tokio::test]
    async fn test_mapping_failure_leaves_index_closed() {
        let backend = Arc::new(
            MockBackend::new()
                .with_index("orm")
                .failing_admin("put_mapping"),
        );
        let provisioner = IndexProvisioner::new(backend.clone(), settings());

        let err = provisioner.ensure_index().await.unwrap_err();

        assert_eq!(err.failed_step(), ProvisionStep::PutMapping);
        assert!(err.index_left_closed());
        assert!(matches!(
            &err,
            ProvisioningError::MappingFailed { type_name, .. } if type_name == "user"
        ));
        assert!(!backend.index_is_open("orm").await);

        let calls = backend.admin_calls().await;
        assert!(!calls.iter().any(|call| call.name() == "open"));
    }

    #[tokio::test]
    async fn test_create_failure_is_fatal() {
        let backend = Arc::new(MockBackend::new().failing_admin("create"));
        let provisioner = IndexProvisioner::new(backend, settings());

        let err = provisioner.ensure_index().await.unwrap_err();

        assert_eq!(err.failed_step(), ProvisionStep::Create);
        assert!(!err.index_left_closed());
    }

    #[tokio::test]
    async fn test_exists_check_failure() {
        let backend = Arc::new(MockBackend::new().failing_admin("exists"));
        let provisioner = IndexProvisioner::new(backend.clone(), settings());

        let err = provisioner.ensure_index().await.unwrap_err();

        assert_eq!(err.failed_step(), ProvisionStep::ExistsCheck);
        assert_eq!(backend.admin_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reprovisioning_is_idempotent_at_exists_check() {
        let backend = Arc::new(MockBackend::new());
        let provisioner = IndexProvisioner::new(backend.clone(), settings());

        assert_eq!(provisioner.ensure_index().await.unwrap(), ProvisionOutcome::Created);
        assert_eq!(provisioner.ensure_index().await.unwrap(), ProvisionOutcome::Updated);
        assert_eq!(provisioner.index_name(), "orm");
    }
}
