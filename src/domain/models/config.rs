//! Config domain model and the effective-value rule.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::payload;
use crate::domain::errors::DomainResult;

/// A named, shared configuration key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub config_id: i64,
    pub key: String,
    pub value: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl Config {
    /// Overlay a per-client override. Null or empty overrides are ignored.
    #[must_use]
    pub fn with_override(mut self, override_value: Option<&str>) -> Self {
        self.value = effective_value(&self.value, override_value).to_string();
        self
    }

    /// Decode the value as JSON into `T`.
    pub fn parse_value<T: DeserializeOwned>(&self) -> DomainResult<T> {
        payload::decode(&self.value)
    }
}

/// The value a client actually sees: the override when non-empty, else the shared value.
pub fn effective_value<'a>(shared: &'a str, override_value: Option<&'a str>) -> &'a str {
    match override_value {
        Some(v) if !v.is_empty() => v,
        _ => shared,
    }
}

/// Row to insert for a new config.
#[derive(Debug, Clone)]
pub struct NewConfig {
    pub key: String,
    pub value: String,
    pub created: DateTime<Utc>,
}

/// Caller-supplied fields for adding or updating a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDraft {
    pub key: String,
    pub value: String,
}

impl ConfigDraft {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
