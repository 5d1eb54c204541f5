//! Application services: resolution, check-ins, mutations with cache upkeep, listings.

pub mod cache_layer;
pub mod catalog;
pub mod check_in;
pub mod invalidation;
pub mod resolution;

pub use cache_layer::CacheLayer;
pub use catalog::CatalogService;
pub use check_in::CheckInRecorder;
pub use invalidation::InvalidationCoordinator;
pub use resolution::ConfigResolver;

use std::sync::Arc;

use crate::domain::models::ProvisioningConfig;
use crate::domain::ports::{ConfigStore, EntryCache};

/// Every service wired to one store and one shared cache.
///
/// Built once per process; all request handlers share it.
pub struct CaasServices<S: ConfigStore> {
    /// Configuration reads.
    pub resolver: ConfigResolver<S>,
    /// Check-in recording.
    pub check_ins: CheckInRecorder<S>,
    /// All writes.
    pub coordinator: InvalidationCoordinator<S>,
    /// Administrative listings.
    pub catalog: CatalogService<S>,
    /// Record a check-in when a client reads its own configuration.
    pub check_in_on_read: bool,
}

impl<S: ConfigStore> CaasServices<S> {
    /// Wire every service over one store and one cache.
    pub fn new(store: Arc<S>, cache: Arc<dyn EntryCache>, provisioning: &ProvisioningConfig) -> Self {
        let cache = CacheLayer::new(cache);
        let resolver = ConfigResolver::new(Arc::clone(&store), cache.clone());

        Self {
            check_ins: CheckInRecorder::new(Arc::clone(&store), resolver.clone(), provisioning.create_clients),
            coordinator: InvalidationCoordinator::new(Arc::clone(&store), cache),
            catalog: CatalogService::new(store),
            resolver,
            check_in_on_read: provisioning.check_in_on_read,
        }
    }
}
