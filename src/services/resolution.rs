//! Resolution engine: effective configuration lookups.
//!
//! Every lookup is read-through: the cache is consulted first, the store on a
//! miss, and whatever the store returns is written back. Absent rows are never
//! cached, so a miss always reaches the store.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Client, Config};
use crate::domain::ports::ConfigStore;
use crate::services::cache_layer::CacheLayer;

/// Resolves shared and per-client configuration, cache first.
pub struct ConfigResolver<S: ConfigStore> {
    store: Arc<S>,
    cache: CacheLayer,
}

impl<S: ConfigStore> Clone for ConfigResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: self.cache.clone(),
        }
    }
}

impl<S: ConfigStore> ConfigResolver<S> {
    /// Resolver reading `store` through `cache`.
    pub fn new(store: Arc<S>, cache: CacheLayer) -> Self {
        Self { store, cache }
    }

    /// The cache facade shared with the other services.
    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    /// Look up a client by identifier and type name.
    pub async fn resolve_client(&self, identifier: &str, client_type: &str) -> DomainResult<Option<Client>> {
        DomainError::require("identifier", identifier)?;
        DomainError::require("type", client_type)?;

        if let Some(client) = self.cache.client(identifier, client_type).await {
            tracing::debug!(identifier, client_type, "client cache hit");
            return Ok(Some(client));
        }

        tracing::debug!(identifier, client_type, "client cache miss");
        let client = self.store.find_client_by_identifier_and_type(identifier, client_type).await?;
        if let Some(client) = &client {
            self.cache.put_client(client).await;
        }
        Ok(client)
    }

    /// The config `key` as seen by one client, with its override applied.
    ///
    /// `None` when the client is unknown or has no association for `key`.
    pub async fn resolve_config_value(
        &self,
        identifier: &str,
        client_type: &str,
        key: &str,
    ) -> DomainResult<Option<Config>> {
        DomainError::require("key", key)?;

        if let Some(config) = self.cache.client_config(identifier, client_type, key).await {
            tracing::debug!(identifier, client_type, key, "client config cache hit");
            return Ok(Some(config));
        }

        let Some(client) = self.resolve_client(identifier, client_type).await? else {
            return Ok(None);
        };

        tracing::debug!(identifier, client_type, key, "client config cache miss");
        let Some(binding) = self.store.find_association_for_key(client.client_id, key).await? else {
            return Ok(None);
        };

        let effective = binding.effective_config();
        self.cache.put_client_config(&client, &effective).await;
        Ok(Some(effective))
    }

    /// The shared config for `key`, ignoring any client overrides.
    pub async fn resolve_config(&self, key: &str) -> DomainResult<Option<Config>> {
        DomainError::require("key", key)?;

        if let Some(config) = self.cache.config(key).await {
            tracing::debug!(key, "config cache hit");
            return Ok(Some(config));
        }

        tracing::debug!(key, "config cache miss");
        let config = self.store.find_config_by_key(key).await?;
        if let Some(config) = &config {
            self.cache.put_config(config).await;
        }
        Ok(config)
    }

    /// Every config in the store. Never served from cache.
    pub async fn resolve_all_configs(&self) -> DomainResult<Vec<Config>> {
        self.store.list_all_configs().await
    }

    /// Every config associated with a client, overrides applied.
    ///
    /// `None` when the client is unknown; an empty list when it has no associations.
    pub async fn resolve_all_for_client(
        &self,
        identifier: &str,
        client_type: &str,
    ) -> DomainResult<Option<Vec<Config>>> {
        let Some(client) = self.resolve_client(identifier, client_type).await? else {
            return Ok(None);
        };

        let bindings = self.store.list_associations_for_client(client.client_id).await?;
        Ok(Some(bindings.iter().map(|b| b.effective_config()).collect()))
    }
}
