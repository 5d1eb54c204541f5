//! Check-in recording with optional client auto-provisioning.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{CheckInOutcome, NewCheckIn};
use crate::domain::ports::ConfigStore;
use crate::services::resolution::ConfigResolver;

/// Records client check-ins, provisioning unknown clients when enabled.
pub struct CheckInRecorder<S: ConfigStore> {
    store: Arc<S>,
    resolver: ConfigResolver<S>,
    auto_provision: bool,
}

impl<S: ConfigStore> CheckInRecorder<S> {
    /// Recorder over `store`, resolving clients through `resolver`.
    pub fn new(store: Arc<S>, resolver: ConfigResolver<S>, auto_provision: bool) -> Self {
        Self {
            store,
            resolver,
            auto_provision,
        }
    }

    /// Whether unknown clients are created on check-in.
    pub const fn auto_provision(&self) -> bool {
        self.auto_provision
    }

    /// Record that a client contacted the service.
    ///
    /// Unknown clients are created (with their type) when auto-provisioning is
    /// on and rejected otherwise, in which case nothing is written. `extra_data`
    /// is stored verbatim.
    pub async fn check_in(
        &self,
        identifier: &str,
        client_type: &str,
        extra_data: Option<String>,
    ) -> DomainResult<CheckInOutcome> {
        let client = match self.resolver.resolve_client(identifier, client_type).await? {
            Some(client) => client,
            None if self.auto_provision => {
                let client = self.store.provision_client(identifier, client_type, Utc::now()).await?;
                tracing::info!(
                    client_id = client.client_id,
                    identifier,
                    client_type,
                    "auto-provisioned client on check-in"
                );
                self.resolver.cache().put_client(&client).await;
                client
            }
            None => {
                tracing::info!(identifier, client_type, "check-in rejected for unknown client");
                return Ok(CheckInOutcome::Rejected);
            }
        };

        let check_in = self
            .store
            .insert_check_in(&NewCheckIn {
                client_id: client.client_id,
                extra_data,
                check_in_time: Utc::now(),
            })
            .await?;

        tracing::debug!(check_in_id = check_in.check_in_id, client_id = client.client_id, "check-in recorded");
        Ok(CheckInOutcome::Recorded)
    }
}
