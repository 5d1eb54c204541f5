//! Repository port for clients.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Client, NewClient};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Insert a new client and return it with its assigned id.
    async fn insert_client(&self, client: &NewClient) -> DomainResult<Client>;

    async fn get_client(&self, client_id: i64) -> DomainResult<Option<Client>>;

    /// Find a client by its natural identity (identifier, client type name).
    async fn find_client_by_identifier_and_type(
        &self,
        identifier: &str,
        client_type: &str,
    ) -> DomainResult<Option<Client>>;

    async fn list_clients(&self) -> DomainResult<Vec<Client>>;

    async fn list_clients_by_type(&self, client_type_id: i64) -> DomainResult<Vec<Client>>;

    /// Clients whose parent is `parent_client_id`.
    async fn list_child_clients(&self, parent_client_id: i64) -> DomainResult<Vec<Client>>;

    /// Persist identifier, type, parent and updated timestamp of an existing client.
    async fn update_client(&self, client: &Client) -> DomainResult<()>;

    /// Delete a client and its associations, clearing the parent link of its children.
    async fn delete_client(&self, client_id: i64) -> DomainResult<()>;

    /// Find-or-create the client type by name, then find-or-create the client.
    ///
    /// Runs in one transaction and is safe against concurrent provisioning of
    /// the same identity.
    async fn provision_client(
        &self,
        identifier: &str,
        client_type: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Client>;
}
