//! Moka-backed entry cache.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::{CacheKey, CachedEntry};
use crate::domain::ports::EntryCache;

/// Entry cache keyed by the structured cache key.
///
/// The rendered key templates are ambiguous when identifiers contain the
/// template separators, so the string form is only used for logging.
#[derive(Clone)]
pub struct MokaEntryCache {
    entries: Cache<CacheKey, Arc<CachedEntry>>,
}

impl MokaEntryCache {
    /// Cache whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { entries }
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[async_trait]
impl EntryCache for MokaEntryCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedEntry> {
        self.entries
            .get(key)
            .await
            .map(|entry| (*entry).clone())
    }

    async fn set(&self, key: CacheKey, entry: CachedEntry) {
        self.entries.insert(key, Arc::new(entry)).await;
    }

    async fn remove(&self, key: &CacheKey) {
        self.entries.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;
    use chrono::Utc;

    fn entry(value: &str) -> CachedEntry {
        CachedEntry::Config(Config {
            config_id: 1,
            key: "k".to_string(),
            value: value.to_string(),
            created: Utc::now(),
            updated: None,
        })
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let cache = MokaEntryCache::new(Duration::from_secs(60), 100);
        let key = CacheKey::config("k");

        assert!(cache.get(&key).await.is_none());
        cache.set(key.clone(), entry("1")).await;
        let cached = cache.get(&key).await.and_then(CachedEntry::into_config).unwrap();
        assert_eq!(cached.value, "1");

        cache.remove(&key).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let cache = MokaEntryCache::new(Duration::from_secs(60), 100);
        let key = CacheKey::config("k");
        cache.set(key.clone(), entry("1")).await;
        cache.set(key.clone(), entry("2")).await;

        let value = cache.get(&key).await.and_then(CachedEntry::into_config).unwrap();
        assert_eq!(value.value, "2");
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = MokaEntryCache::new(Duration::from_millis(50), 100);
        let key = CacheKey::client_config("a", "b", "k");
        cache.set(key.clone(), entry("1")).await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_keys_do_not_collide_across_kinds() {
        let cache = MokaEntryCache::new(Duration::from_secs(60), 100);
        cache.set(CacheKey::config("k"), entry("global")).await;
        assert!(cache.get(&CacheKey::client_config("a", "b", "k")).await.is_none());
    }

    #[tokio::test]
    async fn test_separator_in_identifier_does_not_alias() {
        let cache = MokaEntryCache::new(Duration::from_secs(60), 100);
        let first = CacheKey::client_config("a-Tb", "c", "k");
        let second = CacheKey::client_config("a", "b-Tc", "k");
        assert_eq!(first.to_string(), second.to_string());

        cache.set(first.clone(), entry("one")).await;
        cache.set(second.clone(), entry("two")).await;

        let value = |key: CacheKey| {
            let cache = cache.clone();
            async move { cache.get(&key).await.and_then(CachedEntry::into_config).unwrap().value }
        };
        assert_eq!(value(first).await, "one");
        assert_eq!(value(second).await, "two");
    }
}
