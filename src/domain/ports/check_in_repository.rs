//! Repository port for the check-in log.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{CheckIn, CheckInDetail, NewCheckIn};

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Append a check-in. Check-ins are never updated.
    async fn insert_check_in(&self, check_in: &NewCheckIn) -> DomainResult<CheckIn>;

    /// Most recent check-ins first.
    async fn list_recent_check_ins(&self, limit: u32) -> DomainResult<Vec<CheckInDetail>>;
}
