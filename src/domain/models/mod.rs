//! Domain models for the configuration service.

pub mod association;
pub mod cache;
pub mod check_in;
pub mod client;
pub mod client_type;
pub mod config;
pub mod payload;
pub mod settings;

pub use association::{
    AssociationBinding, ClientAssignment, ConfigAssignment, ConfigAssociation, NewAssociation,
};
pub use cache::{CacheKey, CachedEntry};
pub use check_in::{CheckIn, CheckInDetail, CheckInOutcome, NewCheckIn};
pub use client::{Client, ClientDraft, NewClient};
pub use client_type::{ClientType, ClientTypeDraft};
pub use config::{effective_value, Config, ConfigDraft, NewConfig};
pub use settings::{
    CacheConfig, DatabaseConfig, LoggingConfig, ProvisioningConfig, ServerConfig, Settings,
};
