//! Typed facade over the entry cache.
//!
//! Builds keys from entity identity and unwraps cached entries to the
//! expected entity. An entry of the wrong kind under a key is treated as a miss.

use std::sync::Arc;

use crate::domain::models::{AssociationBinding, CacheKey, CachedEntry, Client, Config};
use crate::domain::ports::EntryCache;

/// Typed access to the shared entry cache.
#[derive(Clone)]
pub struct CacheLayer {
    cache: Arc<dyn EntryCache>,
}

impl CacheLayer {
    /// Wrap a cache backend.
    pub fn new(cache: Arc<dyn EntryCache>) -> Self {
        Self { cache }
    }

    /// Cached client for an identity, if any.
    pub async fn client(&self, identifier: &str, client_type: &str) -> Option<Client> {
        let key = CacheKey::client(identifier, client_type);
        let entry = self.cache.get(&key).await?;
        let client = entry.into_client();
        if client.is_none() {
            tracing::warn!(key = %key, "cache entry is not a client");
        }
        client
    }

    /// Cache a client under its identity key.
    pub async fn put_client(&self, client: &Client) {
        self.cache.set(client.cache_key(), CachedEntry::Client(client.clone())).await;
    }

    /// Drop a client's identity entry.
    pub async fn evict_client(&self, client: &Client) {
        self.cache.remove(&client.cache_key()).await;
    }

    /// Cached shared config for `key`.
    pub async fn config(&self, key: &str) -> Option<Config> {
        self.config_entry(&CacheKey::config(key)).await
    }

    /// Cache a shared config under its key.
    pub async fn put_config(&self, config: &Config) {
        self.cache
            .set(CacheKey::config(&config.key), CachedEntry::Config(config.clone()))
            .await;
    }

    /// Drop the shared entry for `key`.
    pub async fn evict_config(&self, key: &str) {
        self.cache.remove(&CacheKey::config(key)).await;
    }

    /// A client's effective value for `key`.
    pub async fn client_config(&self, identifier: &str, client_type: &str, key: &str) -> Option<Config> {
        self.config_entry(&CacheKey::client_config(identifier, client_type, key)).await
    }

    /// Cache a client's effective config.
    pub async fn put_client_config(&self, client: &Client, effective: &Config) {
        self.cache
            .set(client.config_cache_key(&effective.key), CachedEntry::Config(effective.clone()))
            .await;
    }

    /// Cache the effective config of a binding under its per-client key.
    pub async fn put_binding(&self, binding: &AssociationBinding) {
        self.cache
            .set(binding.cache_key(), CachedEntry::Config(binding.effective_config()))
            .await;
    }

    /// Drop the per-client entry of a binding.
    pub async fn evict_binding(&self, binding: &AssociationBinding) {
        self.cache.remove(&binding.cache_key()).await;
    }

    async fn config_entry(&self, key: &CacheKey) -> Option<Config> {
        let entry = self.cache.get(key).await?;
        let config = entry.into_config();
        if config.is_none() {
            tracing::warn!(key = %key, "cache entry is not a config");
        }
        config
    }
}
