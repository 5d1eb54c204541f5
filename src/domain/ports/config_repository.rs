//! Repository port for configs.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Config, NewConfig};

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Insert a new config and return it with its assigned id.
    async fn insert_config(&self, config: &NewConfig) -> DomainResult<Config>;

    async fn get_config(&self, config_id: i64) -> DomainResult<Option<Config>>;

    /// Exact key match; no prefix or pattern matching.
    async fn find_config_by_key(&self, key: &str) -> DomainResult<Option<Config>>;

    async fn list_all_configs(&self) -> DomainResult<Vec<Config>>;

    /// Persist key, value and updated timestamp of an existing config.
    async fn update_config(&self, config: &Config) -> DomainResult<()>;

    /// Delete a config and every association referencing it.
    async fn delete_config(&self, config_id: i64) -> DomainResult<()>;
}
