//! Configuration management infrastructure
//!
//! Hierarchical settings using figment:
//! - YAML file loading
//! - Environment variable overrides, including the legacy process flags
//! - Settings validation

pub mod loader;

pub use loader::{ConfigError, SettingsLoader, LOCAL_SETTINGS_FILE, SETTINGS_FILE};
