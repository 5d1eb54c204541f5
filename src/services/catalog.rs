//! Administrative read access to the store.
//!
//! Listings always go to the store; nothing here touches the cache.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AssociationBinding, CheckInDetail, Client, ClientType, Config};
use crate::domain::ports::ConfigStore;

/// Check-ins returned when no limit is given.
pub const DEFAULT_CHECK_IN_LIMIT: u32 = 100;

/// Upper bound on a single check-in listing.
pub const MAX_CHECK_IN_LIMIT: u32 = 1_000;

/// Administrative listings and lookups by id.
pub struct CatalogService<S: ConfigStore> {
    store: Arc<S>,
}

impl<S: ConfigStore> CatalogService<S> {
    /// Catalog over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All client types.
    pub async fn list_client_types(&self) -> DomainResult<Vec<ClientType>> {
        self.store.list_client_types().await
    }

    /// One client type, or `ClientTypeNotFound`.
    pub async fn get_client_type(&self, client_type_id: i64) -> DomainResult<ClientType> {
        self.store
            .get_client_type(client_type_id)
            .await?
            .ok_or(DomainError::ClientTypeNotFound(client_type_id))
    }

    /// All clients.
    pub async fn list_clients(&self) -> DomainResult<Vec<Client>> {
        self.store.list_clients().await
    }

    /// One client, or `ClientNotFound`.
    pub async fn get_client(&self, client_id: i64) -> DomainResult<Client> {
        self.store.get_client(client_id).await?.ok_or(DomainError::ClientNotFound(client_id))
    }

    /// All configs.
    pub async fn list_configs(&self) -> DomainResult<Vec<Config>> {
        self.store.list_all_configs().await
    }

    /// One config, or `ConfigNotFound`.
    pub async fn get_config(&self, config_id: i64) -> DomainResult<Config> {
        self.store.get_config(config_id).await?.ok_or(DomainError::ConfigNotFound(config_id))
    }

    /// Associations of a client with their effective values.
    pub async fn associations_for_client(&self, client_id: i64) -> DomainResult<Vec<AssociationBinding>> {
        self.get_client(client_id).await?;
        self.store.list_associations_for_client(client_id).await
    }

    /// Associations referencing a config.
    pub async fn associations_for_config(&self, config_id: i64) -> DomainResult<Vec<AssociationBinding>> {
        self.get_config(config_id).await?;
        self.store.list_associations_for_config(config_id).await
    }

    /// Most recent check-ins first, clamped to [`MAX_CHECK_IN_LIMIT`].
    pub async fn recent_check_ins(&self, limit: Option<u32>) -> DomainResult<Vec<CheckInDetail>> {
        let limit = limit.unwrap_or(DEFAULT_CHECK_IN_LIMIT).min(MAX_CHECK_IN_LIMIT);
        self.store.list_recent_check_ins(limit).await
    }
}
