//! Domain layer for the configuration service.
//!
//! This module contains the entities, the effective-value rule, cache key
//! derivation and the port traits implemented by adapters.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
