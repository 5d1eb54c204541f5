//! Invalidation coordinator: every mutation and the cache maintenance it implies.
//!
//! Each operation follows the same sequence:
//!
//! 1. validate input and load the rows whose cache entries will go stale,
//! 2. perform the store write (one transaction for compound writes),
//! 3. only after the write succeeded, evict stale keys and repopulate fresh ones.
//!
//! A failed or timed-out write returns the error before step 3, so the cache is
//! never touched for a mutation whose effect on the store is unknown.

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AssociationBinding, Client, ClientAssignment, ClientDraft, ClientType, ClientTypeDraft, Config,
    ConfigAssignment, ConfigAssociation, ConfigDraft, NewAssociation, NewClient, NewConfig,
};
use crate::domain::ports::ConfigStore;
use crate::services::cache_layer::CacheLayer;

/// Performs every mutation and keeps the entry cache consistent with the store.
pub struct InvalidationCoordinator<S: ConfigStore> {
    store: Arc<S>,
    cache: CacheLayer,
}

impl<S: ConfigStore> InvalidationCoordinator<S> {
    /// Coordinator writing to `store` and maintaining `cache`.
    pub fn new(store: Arc<S>, cache: CacheLayer) -> Self {
        Self { store, cache }
    }

    // Client types

    /// Add a client type. Nothing is cached for types.
    pub async fn add_client_type(&self, draft: ClientTypeDraft) -> DomainResult<ClientType> {
        DomainError::require("name", &draft.name)?;

        let client_type = self.store.insert_client_type(&draft.name, Utc::now()).await?;
        tracing::info!(client_type_id = client_type.client_type_id, name = %client_type.name, "client type added");
        Ok(client_type)
    }

    /// Update a client type and refresh the cached copy held by every client of that type.
    ///
    /// A rename also moves the client and per-client config entries to the new key.
    pub async fn update_client_type(&self, client_type_id: i64, draft: ClientTypeDraft) -> DomainResult<ClientType> {
        DomainError::require("name", &draft.name)?;

        let old = self.require_client_type(client_type_id).await?;
        let renamed = old.name != draft.name;
        let clients = self.store.list_clients_by_type(client_type_id).await?;
        let bindings = if renamed {
            self.store.list_associations_for_client_type(client_type_id).await?
        } else {
            Vec::new()
        };

        let updated = ClientType {
            name: draft.name,
            updated: Some(Utc::now()),
            ..old
        };
        self.store.update_client_type(&updated).await?;

        for mut client in clients {
            if renamed {
                self.cache.evict_client(&client).await;
            }
            client.client_type = updated.clone();
            self.cache.put_client(&client).await;
        }
        for mut binding in bindings {
            self.cache.evict_binding(&binding).await;
            binding.client_type.clone_from(&updated.name);
            self.cache.put_binding(&binding).await;
        }

        tracing::info!(client_type_id, name = %updated.name, renamed, "client type updated");
        Ok(updated)
    }

    /// Delete a client type, every client of that type and their associations.
    pub async fn delete_client_type(&self, client_type_id: i64) -> DomainResult<()> {
        self.require_client_type(client_type_id).await?;

        let clients = self.store.list_clients_by_type(client_type_id).await?;
        let bindings = self.store.list_associations_for_client_type(client_type_id).await?;
        let removed: HashSet<i64> = clients.iter().map(|c| c.client_id).collect();
        let mut orphans = Vec::new();
        for client in &clients {
            orphans.extend(
                self.store
                    .list_child_clients(client.client_id)
                    .await?
                    .into_iter()
                    .filter(|child| !removed.contains(&child.client_id)),
            );
        }

        self.store.delete_client_type(client_type_id).await?;

        for binding in &bindings {
            self.cache.evict_binding(binding).await;
        }
        for client in &clients {
            self.cache.evict_client(client).await;
        }
        self.detach_children(orphans).await;

        tracing::info!(client_type_id, clients = clients.len(), "client type deleted");
        Ok(())
    }

    // Clients

    /// Add a client and cache it under its identity.
    pub async fn add_client(&self, draft: ClientDraft) -> DomainResult<Client> {
        DomainError::require("identifier", &draft.identifier)?;
        DomainError::require("type", &draft.client_type)?;

        let client_type = self.require_client_type_named(&draft.client_type).await?;
        if let Some(parent_id) = draft.parent_client_id {
            self.require_parent(parent_id).await?;
        }

        let client = self
            .store
            .insert_client(&NewClient {
                identifier: draft.identifier,
                client_type_id: client_type.client_type_id,
                parent_client_id: draft.parent_client_id,
                created: Utc::now(),
            })
            .await?;

        self.cache.put_client(&client).await;
        tracing::info!(client_id = client.client_id, identifier = %client.identifier, "client added");
        Ok(client)
    }

    /// Update a client; a changed identity moves its client and per-config cache entries.
    pub async fn update_client(&self, client_id: i64, draft: ClientDraft) -> DomainResult<Client> {
        DomainError::require("identifier", &draft.identifier)?;
        DomainError::require("type", &draft.client_type)?;

        let old = self.require_client(client_id).await?;
        let client_type = self.require_client_type_named(&draft.client_type).await?;
        if let Some(parent_id) = draft.parent_client_id {
            self.ensure_acyclic(client_id, parent_id).await?;
        }

        let updated = Client {
            identifier: draft.identifier,
            client_type,
            parent_client_id: draft.parent_client_id,
            updated: Some(Utc::now()),
            ..old.clone()
        };
        let moved = updated.identity_differs(&old);
        let bindings = if moved {
            self.store.list_associations_for_client(client_id).await?
        } else {
            Vec::new()
        };

        self.store.update_client(&updated).await?;

        if moved {
            self.cache.evict_client(&old).await;
        }
        self.cache.put_client(&updated).await;
        for mut binding in bindings {
            self.cache.evict_binding(&binding).await;
            binding.identifier.clone_from(&updated.identifier);
            binding.client_type = updated.type_name().to_string();
            self.cache.put_binding(&binding).await;
        }

        tracing::info!(client_id, identifier = %updated.identifier, moved, "client updated");
        Ok(updated)
    }

    /// Delete a client and its associations. Children are detached, never deleted.
    pub async fn delete_client(&self, client_id: i64) -> DomainResult<()> {
        let client = self.require_client(client_id).await?;
        let bindings = self.store.list_associations_for_client(client_id).await?;
        let children = self.store.list_child_clients(client_id).await?;

        self.store.delete_client(client_id).await?;

        for binding in &bindings {
            self.cache.evict_binding(binding).await;
        }
        self.cache.evict_client(&client).await;
        self.detach_children(children).await;

        tracing::info!(client_id, identifier = %client.identifier, "client deleted");
        Ok(())
    }

    // Configs

    /// Add a config and cache it under its key. Key and value are required.
    pub async fn add_config(&self, draft: ConfigDraft) -> DomainResult<Config> {
        DomainError::require("key", &draft.key)?;
        DomainError::require("value", &draft.value)?;

        let config = self
            .store
            .insert_config(&NewConfig {
                key: draft.key,
                value: draft.value,
                created: Utc::now(),
            })
            .await?;

        self.cache.put_config(&config).await;
        tracing::info!(config_id = config.config_id, key = %config.key, "config added");
        Ok(config)
    }

    /// Update a config and refresh the per-client entries of every associated client.
    pub async fn update_config(&self, config_id: i64, draft: ConfigDraft) -> DomainResult<Config> {
        DomainError::require("key", &draft.key)?;
        DomainError::require("value", &draft.value)?;

        let old = self.require_config(config_id).await?;
        let bindings = self.store.list_associations_for_config(config_id).await?;
        let updated = Config {
            key: draft.key,
            value: draft.value,
            updated: Some(Utc::now()),
            ..old.clone()
        };

        self.store.update_config(&updated).await?;

        if old.key != updated.key {
            self.cache.evict_config(&old.key).await;
        }
        self.cache.put_config(&updated).await;
        for mut binding in bindings {
            self.cache.evict_binding(&binding).await;
            binding.config = updated.clone();
            self.cache.put_binding(&binding).await;
        }

        tracing::info!(config_id, key = %updated.key, "config updated");
        Ok(updated)
    }

    /// Delete a config together with every association referencing it.
    pub async fn delete_config(&self, config_id: i64) -> DomainResult<()> {
        let config = self.require_config(config_id).await?;
        let bindings = self.store.list_associations_for_config(config_id).await?;

        self.store.delete_config(config_id).await?;

        for binding in &bindings {
            self.cache.evict_binding(binding).await;
        }
        self.cache.evict_config(&config.key).await;

        tracing::info!(config_id, key = %config.key, associations = bindings.len(), "config deleted");
        Ok(())
    }

    // Associations

    /// Replace the full set of configs assigned to a client.
    ///
    /// Rejected as a whole when a config id repeats or does not exist.
    pub async fn manage_associations_for_client(
        &self,
        client_id: i64,
        assignments: Vec<ConfigAssignment>,
    ) -> DomainResult<Vec<AssociationBinding>> {
        let client = self.require_client(client_id).await?;

        let mut configs = HashMap::new();
        for assignment in &assignments {
            if configs.contains_key(&assignment.config_id) {
                return Err(DomainError::DuplicateAssociation {
                    client_id,
                    config_id: assignment.config_id,
                });
            }
            let config = self.store.get_config(assignment.config_id).await?.ok_or_else(|| {
                DomainError::DanglingReference(format!("config {} does not exist", assignment.config_id))
            })?;
            configs.insert(assignment.config_id, config);
        }

        let previous = self.store.list_associations_for_client(client_id).await?;
        let now = Utc::now();
        let rows: Vec<NewAssociation> = assignments
            .into_iter()
            .map(|a| NewAssociation {
                client_id,
                config_id: a.config_id,
                value: normalize_override(a.value),
                created: now,
            })
            .collect();

        let saved = self.store.replace_associations_for_client(client_id, &rows).await?;

        let clients = HashMap::from([(client_id, client)]);
        let bindings = bind(saved, &clients, &configs);
        self.refresh_bindings(&previous, &bindings).await;

        tracing::info!(client_id, associations = bindings.len(), "client associations replaced");
        Ok(bindings)
    }

    /// Replace the full set of clients a config is assigned to.
    ///
    /// Rejected as a whole when a client id repeats or does not exist.
    pub async fn manage_associations_for_config(
        &self,
        config_id: i64,
        assignments: Vec<ClientAssignment>,
    ) -> DomainResult<Vec<AssociationBinding>> {
        let config = self.require_config(config_id).await?;

        let mut clients = HashMap::new();
        for assignment in &assignments {
            if clients.contains_key(&assignment.client_id) {
                return Err(DomainError::DuplicateAssociation {
                    client_id: assignment.client_id,
                    config_id,
                });
            }
            let client = self.store.get_client(assignment.client_id).await?.ok_or_else(|| {
                DomainError::DanglingReference(format!("client {} does not exist", assignment.client_id))
            })?;
            clients.insert(assignment.client_id, client);
        }

        let previous = self.store.list_associations_for_config(config_id).await?;
        let now = Utc::now();
        let rows: Vec<NewAssociation> = assignments
            .into_iter()
            .map(|a| NewAssociation {
                client_id: a.client_id,
                config_id,
                value: normalize_override(a.value),
                created: now,
            })
            .collect();

        let saved = self.store.replace_associations_for_config(config_id, &rows).await?;

        let configs = HashMap::from([(config_id, config)]);
        let bindings = bind(saved, &clients, &configs);
        self.refresh_bindings(&previous, &bindings).await;

        tracing::info!(config_id, associations = bindings.len(), "config associations replaced");
        Ok(bindings)
    }

    // Helpers

    async fn require_client_type(&self, client_type_id: i64) -> DomainResult<ClientType> {
        self.store
            .get_client_type(client_type_id)
            .await?
            .ok_or(DomainError::ClientTypeNotFound(client_type_id))
    }

    async fn require_client_type_named(&self, name: &str) -> DomainResult<ClientType> {
        self.store
            .find_client_type_by_name(name)
            .await?
            .ok_or_else(|| DomainError::DanglingReference(format!("client type '{name}' does not exist")))
    }

    async fn require_client(&self, client_id: i64) -> DomainResult<Client> {
        self.store.get_client(client_id).await?.ok_or(DomainError::ClientNotFound(client_id))
    }

    async fn require_config(&self, config_id: i64) -> DomainResult<Config> {
        self.store.get_config(config_id).await?.ok_or(DomainError::ConfigNotFound(config_id))
    }

    async fn require_parent(&self, parent_id: i64) -> DomainResult<Client> {
        self.store
            .get_client(parent_id)
            .await?
            .ok_or_else(|| DomainError::DanglingReference(format!("parent client {parent_id} does not exist")))
    }

    /// Reject a parent link that would make `client_id` its own ancestor.
    async fn ensure_acyclic(&self, client_id: i64, parent_id: i64) -> DomainResult<()> {
        let mut path = vec![client_id];
        let mut seen = HashSet::from([client_id]);
        let mut current = Some(parent_id);

        while let Some(ancestor_id) = current {
            path.push(ancestor_id);
            if ancestor_id == client_id {
                return Err(DomainError::ParentCycle(path));
            }
            if !seen.insert(ancestor_id) {
                // pre-existing loop above us that does not include this client
                break;
            }
            current = self.require_parent(ancestor_id).await?.parent_client_id;
        }
        Ok(())
    }

    /// Refresh cached entries of clients whose parent row was just deleted.
    async fn detach_children(&self, children: Vec<Client>) {
        for mut child in children {
            child.parent_client_id = None;
            self.cache.put_client(&child).await;
        }
    }

    async fn refresh_bindings(&self, previous: &[AssociationBinding], current: &[AssociationBinding]) {
        for binding in previous {
            self.cache.evict_binding(binding).await;
        }
        for binding in current {
            self.cache.put_binding(binding).await;
        }
    }
}

/// An empty override means "use the config's value" and is stored as absent.
fn normalize_override(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn bind(
    saved: Vec<ConfigAssociation>,
    clients: &HashMap<i64, Client>,
    configs: &HashMap<i64, Config>,
) -> Vec<AssociationBinding> {
    saved
        .into_iter()
        .filter_map(|association| {
            let client = clients.get(&association.client_id)?;
            let config = configs.get(&association.config_id)?;
            Some(AssociationBinding {
                identifier: client.identifier.clone(),
                client_type: client.type_name().to_string(),
                config: config.clone(),
                association,
            })
        })
        .collect()
}
