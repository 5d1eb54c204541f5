//! Repository port for client types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainResult;
use crate::domain::models::ClientType;

#[async_trait]
pub trait ClientTypeRepository: Send + Sync {
    /// Insert a new client type and return it with its assigned id.
    async fn insert_client_type(&self, name: &str, created: DateTime<Utc>) -> DomainResult<ClientType>;

    async fn get_client_type(&self, client_type_id: i64) -> DomainResult<Option<ClientType>>;

    async fn find_client_type_by_name(&self, name: &str) -> DomainResult<Option<ClientType>>;

    async fn list_client_types(&self) -> DomainResult<Vec<ClientType>>;

    /// Persist the name and updated timestamp of an existing client type.
    async fn update_client_type(&self, client_type: &ClientType) -> DomainResult<()>;

    /// Delete a client type together with every client of that type and their
    /// associations. Clients parented by a removed client lose their parent link.
    async fn delete_client_type(&self, client_type_id: i64) -> DomainResult<()>;
}
