//! Client domain model.
//!
//! A client is identified by its identifier together with its client type name.
//! Clients may point at a parent client; the parent links form a tree and are
//! checked for cycles before any write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cache::CacheKey;
use super::client_type::ClientType;

/// A registered consumer of configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_id: i64,
    pub identifier: String,
    pub client_type: ClientType,
    pub parent_client_id: Option<i64>,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl Client {
    pub const fn client_type_id(&self) -> i64 {
        self.client_type.client_type_id
    }

    pub fn type_name(&self) -> &str {
        &self.client_type.name
    }

    /// Cache key under which this client is stored.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::client(&self.identifier, self.type_name())
    }

    /// Cache key for this client's effective value of `key`.
    pub fn config_cache_key(&self, key: &str) -> CacheKey {
        CacheKey::client_config(&self.identifier, self.type_name(), key)
    }

    /// Whether the natural identity differs from `other`.
    pub fn identity_differs(&self, other: &Self) -> bool {
        self.identifier != other.identifier || self.type_name() != other.type_name()
    }
}

/// Row to insert for a new client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub identifier: String,
    pub client_type_id: i64,
    pub parent_client_id: Option<i64>,
    pub created: DateTime<Utc>,
}

/// Caller-supplied fields for adding or updating a client.
///
/// The client type is referenced by name and must already exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub identifier: String,
    #[serde(alias = "type")]
    pub client_type: String,
    #[serde(default)]
    pub parent_client_id: Option<i64>,
}

impl ClientDraft {
    pub fn new(identifier: impl Into<String>, client_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            client_type: client_type.into(),
            parent_client_id: None,
        }
    }

    pub const fn with_parent(mut self, parent_client_id: i64) -> Self {
        self.parent_client_id = Some(parent_client_id);
        self
    }
}
