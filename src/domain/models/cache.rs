//! Cache keys and cached values.
//!
//! Keys are derived from entity identity tuples and render as:
//!
//! - client: `client_I{identifier}-T{type}`
//! - config by key: `config_K{key}`
//! - per-client config: `config_I{identifier}-T{type}-K{key}`
//!
//! The rendering is for logs only. Identifiers may contain `-T` or `-K`, so
//! caches must key on [`CacheKey`] itself.

use std::fmt;

use super::client::Client;
use super::config::Config;

/// Identity of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Client {
        identifier: String,
        client_type: String,
    },
    Config {
        key: String,
    },
    ClientConfig {
        identifier: String,
        client_type: String,
        key: String,
    },
}

impl CacheKey {
    pub fn client(identifier: &str, client_type: &str) -> Self {
        Self::Client {
            identifier: identifier.to_string(),
            client_type: client_type.to_string(),
        }
    }

    pub fn config(key: &str) -> Self {
        Self::Config {
            key: key.to_string(),
        }
    }

    pub fn client_config(identifier: &str, client_type: &str, key: &str) -> Self {
        Self::ClientConfig {
            identifier: identifier.to_string(),
            client_type: client_type.to_string(),
            key: key.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client {
                identifier,
                client_type,
            } => write!(f, "client_I{identifier}-T{client_type}"),
            Self::Config { key } => write!(f, "config_K{key}"),
            Self::ClientConfig {
                identifier,
                client_type,
                key,
            } => write!(f, "config_I{identifier}-T{client_type}-K{key}"),
        }
    }
}

/// A value held in the entry cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedEntry {
    Client(Client),
    Config(Config),
}

impl CachedEntry {
    pub fn into_client(self) -> Option<Client> {
        match self {
            Self::Client(client) => Some(client),
            Self::Config(_) => None,
        }
    }

    pub fn into_config(self) -> Option<Config> {
        match self {
            Self::Config(config) => Some(config),
            Self::Client(_) => None,
        }
    }
}
