//! Config association domain model.
//!
//! An association grants one client one config, optionally with an override
//! value. Bindings are associations joined with the client identity and the
//! config row, which is everything needed to build per-client cache entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cache::CacheKey;
use super::config::Config;

/// Link granting a client a (possibly overridden) value for a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigAssociation {
    pub config_association_id: i64,
    pub client_id: i64,
    pub config_id: i64,
    pub value: Option<String>,
    pub created: DateTime<Utc>,
}

impl ConfigAssociation {
    /// The override value, treating an empty string as absent.
    pub fn override_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Row to insert for a new association.
#[derive(Debug, Clone)]
pub struct NewAssociation {
    pub client_id: i64,
    pub config_id: i64,
    pub value: Option<String>,
    pub created: DateTime<Utc>,
}

/// An association joined with its client identity and config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationBinding {
    pub association: ConfigAssociation,
    pub identifier: String,
    pub client_type: String,
    pub config: Config,
}

impl AssociationBinding {
    /// The config as this client sees it.
    pub fn effective_config(&self) -> Config {
        self.config.clone().with_override(self.association.override_value())
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::client_config(&self.identifier, &self.client_type, &self.config.key)
    }
}

/// One entry of a bulk assignment scoped to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigAssignment {
    pub config_id: i64,
    #[serde(default)]
    pub value: Option<String>,
}

/// One entry of a bulk assignment scoped to a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAssignment {
    pub client_id: i64,
    #[serde(default)]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(override_value: Option<&str>) -> AssociationBinding {
        let now = Utc::now();
        AssociationBinding {
            association: ConfigAssociation {
                config_association_id: 1,
                client_id: 2,
                config_id: 3,
                value: override_value.map(ToString::to_string),
                created: now,
            },
            identifier: "kiosk-7".to_string(),
            client_type: "Kiosk".to_string(),
            config: Config {
                config_id: 3,
                key: "theme".to_string(),
                value: "light".to_string(),
                created: now,
                updated: None,
            },
        }
    }

    #[test]
    fn test_effective_config_uses_override() {
        assert_eq!(binding(Some("dark")).effective_config().value, "dark");
    }

    #[test]
    fn test_effective_config_ignores_empty_override() {
        assert_eq!(binding(Some("")).effective_config().value, "light");
        assert_eq!(binding(None).effective_config().value, "light");
    }

    #[test]
    fn test_binding_cache_key() {
        assert_eq!(binding(None).cache_key().to_string(), "config_Ikiosk-7-TKiosk-Ktheme");
    }

    #[test]
    fn test_assignment_value_optional() {
        let a: ConfigAssignment = serde_json::from_str(r#"{"configId": 4}"#).unwrap();
        assert_eq!(a.config_id, 4);
        assert!(a.value.is_none());
    }
}
