//! Common test utilities for integration tests
//!
//! Provides a migrated in-memory store, a real moka cache and the full
//! service graph, plus helpers for seeding data through the coordinator.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use caas::adapters::cache::MokaEntryCache;
use caas::adapters::sqlite::{create_test_store, SqliteStore};
use caas::domain::models::{
    Client, ClientDraft, ClientTypeDraft, Config, ConfigAssignment, ConfigDraft, ProvisioningConfig,
};
use caas::domain::ports::ClientTypeRepository;
use caas::services::CaasServices;

/// Services wired to an in-memory store, with handles to the store and cache.
pub struct TestEnv {
    pub store: Arc<SqliteStore>,
    pub cache: Arc<MokaEntryCache>,
    pub services: Arc<CaasServices<SqliteStore>>,
}

/// Default environment: cache on, no auto-provisioning, check-in on read.
pub async fn test_env() -> TestEnv {
    test_env_with(ProvisioningConfig::default()).await
}

pub async fn test_env_with(provisioning: ProvisioningConfig) -> TestEnv {
    let store = Arc::new(create_test_store().await.expect("Failed to create test store"));
    let cache = Arc::new(MokaEntryCache::new(Duration::from_secs(60), 1_000));
    let services = Arc::new(CaasServices::new(Arc::clone(&store), cache.clone(), &provisioning));
    TestEnv { store, cache, services }
}

impl TestEnv {
    /// Add a client, creating its type first when needed.
    pub async fn add_client(&self, identifier: &str, client_type: &str) -> Client {
        let existing = self
            .store
            .find_client_type_by_name(client_type)
            .await
            .expect("Failed to look up client type");
        if existing.is_none() {
            self.services
                .coordinator
                .add_client_type(ClientTypeDraft::new(client_type))
                .await
                .expect("Failed to add client type");
        }

        self.services
            .coordinator
            .add_client(ClientDraft::new(identifier, client_type))
            .await
            .expect("Failed to add client")
    }

    pub async fn add_config(&self, key: &str, value: &str) -> Config {
        self.services
            .coordinator
            .add_config(ConfigDraft::new(key, value))
            .await
            .expect("Failed to add config")
    }

    /// Replace the client's associations with `(config, override)` pairs.
    pub async fn assign(&self, client: &Client, assignments: &[(&Config, Option<&str>)]) {
        let assignments = assignments
            .iter()
            .map(|(config, value)| ConfigAssignment {
                config_id: config.config_id,
                value: value.map(str::to_string),
            })
            .collect();
        self.services
            .coordinator
            .manage_associations_for_client(client.client_id, assignments)
            .await
            .expect("Failed to assign configs");
    }
}
