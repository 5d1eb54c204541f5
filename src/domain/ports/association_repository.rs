//! Repository port for config associations.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AssociationBinding, ConfigAssociation, NewAssociation};

#[async_trait]
pub trait AssociationRepository: Send + Sync {
    async fn find_config_association(
        &self,
        client_id: i64,
        config_id: i64,
    ) -> DomainResult<Option<ConfigAssociation>>;

    /// The binding for `client_id` whose config key equals `key` exactly.
    async fn find_association_for_key(
        &self,
        client_id: i64,
        key: &str,
    ) -> DomainResult<Option<AssociationBinding>>;

    async fn list_associations_for_client(&self, client_id: i64) -> DomainResult<Vec<AssociationBinding>>;

    async fn list_associations_for_config(&self, config_id: i64) -> DomainResult<Vec<AssociationBinding>>;

    /// Bindings of every client of the given type.
    async fn list_associations_for_client_type(
        &self,
        client_type_id: i64,
    ) -> DomainResult<Vec<AssociationBinding>>;

    /// Replace every association of a client with `associations`.
    async fn replace_associations_for_client(
        &self,
        client_id: i64,
        associations: &[NewAssociation],
    ) -> DomainResult<Vec<ConfigAssociation>>;

    /// Replace every association of a config with `associations`.
    async fn replace_associations_for_config(
        &self,
        config_id: i64,
        associations: &[NewAssociation],
    ) -> DomainResult<Vec<ConfigAssociation>>;
}
