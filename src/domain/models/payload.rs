//! Opaque payload helpers.
//!
//! Config values and check-in extra data are stored as plain strings. Callers
//! that want typed values encode and decode them here, at the boundary.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::DomainResult;

/// Serialize a typed value into the stored string form.
pub fn encode<T: Serialize>(value: &T) -> DomainResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Deserialize a stored string into a typed value.
pub fn decode<T: DeserializeOwned>(raw: &str) -> DomainResult<T> {
    Ok(serde_json::from_str(raw)?)
}

/// Store a JSON value received over the wire: strings verbatim, anything else serialized.
pub fn from_json(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
