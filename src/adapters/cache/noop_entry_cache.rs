//! Pass-through cache used when caching is disabled.

use async_trait::async_trait;

use crate::domain::models::{CacheKey, CachedEntry};
use crate::domain::ports::EntryCache;

/// Holds nothing; every lookup is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEntryCache;

#[async_trait]
impl EntryCache for NoopEntryCache {
    async fn get(&self, _key: &CacheKey) -> Option<CachedEntry> {
        None
    }

    async fn set(&self, _key: CacheKey, _entry: CachedEntry) {}

    async fn remove(&self, _key: &CacheKey) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::build_entry_cache;
    use crate::domain::models::{CacheConfig, Config};
    use chrono::Utc;

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let cache = build_entry_cache(&CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });
        let key = CacheKey::config("k");
        cache
            .set(
                key.clone(),
                CachedEntry::Config(Config {
                    config_id: 1,
                    key: "k".to_string(),
                    value: "v".to_string(),
                    created: Utc::now(),
                    updated: None,
                }),
            )
            .await;
        assert!(cache.get(&key).await.is_none());
    }
}
