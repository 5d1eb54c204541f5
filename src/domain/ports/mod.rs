//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - ClientTypeRepository / ClientRepository / ConfigRepository: entity storage
//! - AssociationRepository: client <-> config links and their joined bindings
//! - CheckInRepository: append-only check-in log
//! - ConfigStore: the full storage backend, every repository at once
//! - EntryCache: key/value cache backend with time-based expiry
//!
//! Every mutating storage operation is atomic: compound writes run inside a
//! single transaction and a failure leaves the store unchanged.

pub mod association_repository;
pub mod check_in_repository;
pub mod client_repository;
pub mod client_type_repository;
pub mod config_repository;
pub mod entry_cache;

pub use association_repository::AssociationRepository;
pub use check_in_repository::CheckInRepository;
pub use client_repository::ClientRepository;
pub use client_type_repository::ClientTypeRepository;
pub use config_repository::ConfigRepository;
pub use entry_cache::EntryCache;

/// The storage backend consumed by the services.
pub trait ConfigStore:
    ClientTypeRepository
    + ClientRepository
    + ConfigRepository
    + AssociationRepository
    + CheckInRepository
    + 'static
{
}

impl<T> ConfigStore for T where
    T: ClientTypeRepository
        + ClientRepository
        + ConfigRepository
        + AssociationRepository
        + CheckInRepository
        + 'static
{
}
