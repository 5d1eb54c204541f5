use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::payload;
use crate::domain::errors::DomainResult;

/// Immutable record of a client contacting the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub check_in_id: i64,
    pub client_id: i64,
    pub extra_data: Option<String>,
    pub check_in_time: DateTime<Utc>,
}

impl CheckIn {
    /// Decode the opaque extra data as JSON into `T`.
    pub fn parse_extra_data<T: DeserializeOwned>(&self) -> DomainResult<Option<T>> {
        self.extra_data.as_deref().map(payload::decode::<T>).transpose()
    }
}

/// Row to append for a new check-in.
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub client_id: i64,
    pub extra_data: Option<String>,
    pub check_in_time: DateTime<Utc>,
}

/// A check-in joined with the identity of the client that made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInDetail {
    #[serde(flatten)]
    pub check_in: CheckIn,
    pub identifier: String,
    pub client_type: String,
}

/// Result of a check-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    Recorded,
    /// Unknown client and auto-provisioning disabled; nothing was written.
    Rejected,
}

impl CheckInOutcome {
    pub const fn is_recorded(self) -> bool {
        matches!(self, Self::Recorded)
    }
}
