//! Cache backend port.

use async_trait::async_trait;

use crate::domain::models::{CacheKey, CachedEntry};

/// Key/value cache with time-based expiry.
///
/// The cache is best-effort: implementations never fail a request. A backend
/// that cannot be reached reports a miss on `get` and logs on writes.
/// Expired entries are reported as misses. Absent values are never cached.
#[async_trait]
pub trait EntryCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<CachedEntry>;

    async fn set(&self, key: CacheKey, entry: CachedEntry);

    async fn remove(&self, key: &CacheKey);
}
