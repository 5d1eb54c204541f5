//! caas - Configuration as a Service
//!
//! Serves key/value configuration to registered clients, with per-client
//! overrides, client check-ins and a read-through cache kept coherent with the
//! store on every administrative write.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): entities, errors and the repository/cache ports
//! - **Service Layer** (`services`): resolution, check-in, invalidation and catalog
//! - **Adapters** (`adapters`): SQLite store, moka cache, axum HTTP API
//! - **Infrastructure Layer** (`infrastructure`): settings and logging
//! - **SDK** (`sdk`): typed HTTP client for the public API
//! - **CLI Layer** (`cli`): `serve` and `migrate`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use caas::adapters::cache::build_entry_cache;
//! use caas::adapters::sqlite::{initialize_database, SqliteStore};
//! use caas::domain::models::Settings;
//! use caas::services::CaasServices;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::default();
//! let store = Arc::new(SqliteStore::new(initialize_database(&settings.database).await?));
//! let services = CaasServices::new(store, build_entry_cache(&settings.cache), &settings.provisioning);
//!
//! let value = services.resolver.resolve_config_value("pos-1", "Register", "currency").await?;
//! println!("{value:?}");
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod sdk;
pub mod services;

pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{Client, ClientType, Config, Settings};
pub use infrastructure::config::{ConfigError, SettingsLoader};
pub use sdk::{CaasClient, SdkError};
pub use services::CaasServices;
