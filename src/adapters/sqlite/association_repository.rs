//! SQLite implementation of the AssociationRepository.
//!
//! Bindings are read through a single join over associations, clients, client
//! types and configs so that callers get everything needed to key and fill
//! per-client cache entries in one round trip.

use async_trait::async_trait;

use super::{parse_datetime, parse_optional_datetime, SqliteStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AssociationBinding, Config, ConfigAssociation, NewAssociation};
use crate::domain::ports::AssociationRepository;

const ASSOCIATION_COLUMNS: &str = "config_association_id, client_id, config_id, value, created";

const BINDING_SELECT: &str = "SELECT a.config_association_id, a.client_id, a.config_id, a.value,
        a.created AS association_created, c.identifier, t.name AS client_type,
        g.config_key, g.config_value, g.created AS config_created, g.updated AS config_updated
    FROM config_associations a
    JOIN clients c ON c.client_id = a.client_id
    JOIN client_types t ON t.client_type_id = c.client_type_id
    JOIN configs g ON g.config_id = a.config_id";

#[derive(Clone, Copy)]
enum Scope {
    Client(i64),
    Config(i64),
}

impl Scope {
    const fn column(&self) -> &'static str {
        match self {
            Self::Client(_) => "client_id",
            Self::Config(_) => "config_id",
        }
    }

    const fn id(&self) -> i64 {
        match self {
            Self::Client(id) | Self::Config(id) => *id,
        }
    }
}

impl SqliteStore {
    async fn list_bindings(&self, filter: &str, id: i64) -> DomainResult<Vec<AssociationBinding>> {
        let rows: Vec<BindingRow> =
            sqlx::query_as(&format!("{BINDING_SELECT} WHERE {filter} ORDER BY g.config_key, c.identifier"))
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete the scope's associations and insert `associations` in one transaction.
    async fn replace_associations(
        &self,
        scope: Scope,
        associations: &[NewAssociation],
    ) -> DomainResult<Vec<ConfigAssociation>> {
        let column = scope.column();
        let mut tx = self.pool.begin().await?;

        let owner_sql = match scope {
            Scope::Client(_) => "SELECT client_id FROM clients WHERE client_id = ?",
            Scope::Config(_) => "SELECT config_id FROM configs WHERE config_id = ?",
        };
        let owner_exists: Option<(i64,)> = sqlx::query_as(owner_sql)
            .bind(scope.id())
            .fetch_optional(&mut *tx)
            .await?;

        if owner_exists.is_none() {
            return Err(match scope {
                Scope::Client(id) => DomainError::ClientNotFound(id),
                Scope::Config(id) => DomainError::ConfigNotFound(id),
            });
        }

        sqlx::query(&format!("DELETE FROM config_associations WHERE {column} = ?"))
            .bind(scope.id())
            .execute(&mut *tx)
            .await?;

        for association in associations {
            sqlx::query("INSERT INTO config_associations (client_id, config_id, value, created) VALUES (?, ?, ?, ?)")
                .bind(association.client_id)
                .bind(association.config_id)
                .bind(&association.value)
                .bind(association.created.to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(|e| match DomainError::from(e) {
                    DomainError::Conflict(_) => DomainError::DuplicateAssociation {
                        client_id: association.client_id,
                        config_id: association.config_id,
                    },
                    other => other,
                })?;
        }

        let rows: Vec<AssociationRow> = sqlx::query_as(&format!(
            "SELECT {ASSOCIATION_COLUMNS} FROM config_associations WHERE {column} = ? ORDER BY config_association_id"
        ))
        .bind(scope.id())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl AssociationRepository for SqliteStore {
    async fn find_config_association(
        &self,
        client_id: i64,
        config_id: i64,
    ) -> DomainResult<Option<ConfigAssociation>> {
        let row: Option<AssociationRow> = sqlx::query_as(&format!(
            "SELECT {ASSOCIATION_COLUMNS} FROM config_associations WHERE client_id = ? AND config_id = ?"
        ))
        .bind(client_id)
        .bind(config_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_association_for_key(
        &self,
        client_id: i64,
        key: &str,
    ) -> DomainResult<Option<AssociationBinding>> {
        let row: Option<BindingRow> =
            sqlx::query_as(&format!("{BINDING_SELECT} WHERE a.client_id = ? AND g.config_key = ?"))
                .bind(client_id)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_associations_for_client(&self, client_id: i64) -> DomainResult<Vec<AssociationBinding>> {
        self.list_bindings("a.client_id = ?", client_id).await
    }

    async fn list_associations_for_config(&self, config_id: i64) -> DomainResult<Vec<AssociationBinding>> {
        self.list_bindings("a.config_id = ?", config_id).await
    }

    async fn list_associations_for_client_type(
        &self,
        client_type_id: i64,
    ) -> DomainResult<Vec<AssociationBinding>> {
        self.list_bindings("t.client_type_id = ?", client_type_id).await
    }

    async fn replace_associations_for_client(
        &self,
        client_id: i64,
        associations: &[NewAssociation],
    ) -> DomainResult<Vec<ConfigAssociation>> {
        self.replace_associations(Scope::Client(client_id), associations).await
    }

    async fn replace_associations_for_config(
        &self,
        config_id: i64,
        associations: &[NewAssociation],
    ) -> DomainResult<Vec<ConfigAssociation>> {
        self.replace_associations(Scope::Config(config_id), associations).await
    }
}

#[derive(sqlx::FromRow)]
struct AssociationRow {
    config_association_id: i64,
    client_id: i64,
    config_id: i64,
    value: Option<String>,
    created: String,
}

impl TryFrom<AssociationRow> for ConfigAssociation {
    type Error = DomainError;

    fn try_from(row: AssociationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            config_association_id: row.config_association_id,
            client_id: row.client_id,
            config_id: row.config_id,
            value: row.value,
            created: parse_datetime(&row.created)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BindingRow {
    config_association_id: i64,
    client_id: i64,
    config_id: i64,
    value: Option<String>,
    association_created: String,
    identifier: String,
    client_type: String,
    config_key: String,
    config_value: String,
    config_created: String,
    config_updated: Option<String>,
}

impl TryFrom<BindingRow> for AssociationBinding {
    type Error = DomainError;

    fn try_from(row: BindingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            association: ConfigAssociation {
                config_association_id: row.config_association_id,
                client_id: row.client_id,
                config_id: row.config_id,
                value: row.value,
                created: parse_datetime(&row.association_created)?,
            },
            identifier: row.identifier,
            client_type: row.client_type,
            config: Config {
                config_id: row.config_id,
                key: row.config_key,
                value: row.config_value,
                created: parse_datetime(&row.config_created)?,
                updated: parse_optional_datetime(row.config_updated)?,
            },
        })
    }
}
