//! In-memory entry cache backends.
//!
//! Uses `moka` for TTL-based concurrent caching. Expiry is purely time-based:
//! an entry becomes a miss once its lifetime elapses, whether or not it was
//! read in between.

pub mod moka_entry_cache;
pub mod noop_entry_cache;

pub use moka_entry_cache::MokaEntryCache;
pub use noop_entry_cache::NoopEntryCache;

use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::CacheConfig;
use crate::domain::ports::EntryCache;

/// Build the process-wide entry cache from settings.
///
/// A disabled cache is a pass-through that never holds anything.
pub fn build_entry_cache(config: &CacheConfig) -> Arc<dyn EntryCache> {
    if config.enabled {
        tracing::info!(
            timeout_minutes = config.timeout_minutes,
            max_capacity = config.max_capacity,
            "in-memory cache enabled"
        );
        Arc::new(MokaEntryCache::new(
            Duration::from_secs(config.timeout_minutes.saturating_mul(60)),
            config.max_capacity,
        ))
    } else {
        tracing::info!("in-memory cache disabled");
        Arc::new(NoopEntryCache)
    }
}
