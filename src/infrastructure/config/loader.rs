use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::Settings;

/// Primary settings file, read from the working directory.
pub const SETTINGS_FILE: &str = "caas.yaml";

/// Optional local overrides layered over [`SETTINGS_FILE`].
pub const LOCAL_SETTINGS_FILE: &str = "caas.local.yaml";

const LEGACY_CACHE_USE: &str = "INMEMORYCACHE_USE";
const LEGACY_CACHE_TIMEOUT: &str = "INMEMORYCACHE_TIMEOUT";
const LEGACY_CREATE_CLIENTS: &str = "CAAS_CREATECLIENTS";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid cache timeout: {0} minutes. Must be at least 1 while the cache is enabled")]
    InvalidCacheTimeout(u64),

    #[error("Invalid cache max_capacity: {0}. Must be at least 1")]
    InvalidCacheCapacity(u64),

    #[error("Invalid server port: {0}")]
    InvalidPort(u16),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidLegacyFlag { name: &'static str, value: String },
}

/// Settings loader with hierarchical merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from the working directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `caas.yaml`
    /// 3. `caas.local.yaml`
    /// 4. `CAAS_*` environment variables, nested with `__`
    /// 5. `INMEMORYCACHE_USE`, `INMEMORYCACHE_TIMEOUT` and `CAAS_CREATECLIENTS`
    pub fn load() -> Result<Settings> {
        Self::load_from(None)
    }

    /// Load settings, reading `path` instead of `caas.yaml` when given.
    pub fn load_from(path: Option<&Path>) -> Result<Settings> {
        let primary = path.unwrap_or_else(|| Path::new(SETTINGS_FILE));

        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(primary))
            .merge(Yaml::file(LOCAL_SETTINGS_FILE))
            .merge(Env::prefixed("CAAS_").split("__"));

        let settings: Settings = Self::merge_legacy_flags(figment)?
            .extract()
            .with_context(|| format!("Failed to load settings (primary file {})", primary.display()))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Apply the single-variable process flags older deployments set.
    fn merge_legacy_flags(mut figment: Figment) -> Result<Figment, ConfigError> {
        if let Ok(value) = std::env::var(LEGACY_CACHE_USE) {
            // Anything other than the exact string "true" disables the cache.
            figment = figment.merge(Serialized::default("cache.enabled", value == "true"));
        }

        if let Ok(value) = std::env::var(LEGACY_CACHE_TIMEOUT) {
            let minutes: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidLegacyFlag {
                name: LEGACY_CACHE_TIMEOUT,
                value: value.clone(),
            })?;
            figment = figment.merge(Serialized::default("cache.timeout_minutes", minutes));
        }

        if let Ok(value) = std::env::var(LEGACY_CREATE_CLIENTS) {
            figment = figment.merge(Serialized::default("provisioning.create_clients", value == "true"));
        }

        Ok(figment)
    }

    /// Validate settings after loading
    pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
        if settings.server.port == 0 {
            return Err(ConfigError::InvalidPort(settings.server.port));
        }

        if settings.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if settings.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(settings.database.max_connections));
        }

        if settings.cache.enabled && settings.cache.timeout_minutes == 0 {
            return Err(ConfigError::InvalidCacheTimeout(settings.cache.timeout_minutes));
        }

        if settings.cache.max_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity(settings.cache.max_capacity));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&settings.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(settings.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&settings.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(settings.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&settings.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(settings.logging.rotation.clone()));
        }

        Ok(())
    }
}
