//! SQLite implementation of the ClientRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{parse_datetime, parse_optional_datetime, SqliteStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Client, ClientType, NewClient};
use crate::domain::ports::ClientRepository;

const CLIENT_SELECT: &str = "SELECT c.client_id, c.identifier, c.parent_client_id, c.created, c.updated,
        t.client_type_id, t.name AS client_type_name, t.created AS client_type_created,
        t.updated AS client_type_updated
    FROM clients c
    JOIN client_types t ON t.client_type_id = c.client_type_id";

#[async_trait]
impl ClientRepository for SqliteStore {
    async fn insert_client(&self, client: &NewClient) -> DomainResult<Client> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT client_type_id FROM client_types WHERE client_type_id = ?")
            .bind(client.client_type_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DomainError::ClientTypeNotFound(client.client_type_id));
        }

        let result = sqlx::query(
            "INSERT INTO clients (identifier, client_type_id, parent_client_id, created) VALUES (?, ?, ?, ?)",
        )
        .bind(&client.identifier)
        .bind(client.client_type_id)
        .bind(client.parent_client_id)
        .bind(client.created.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        let row: ClientRow = sqlx::query_as(&format!("{CLIENT_SELECT} WHERE c.client_id = ?"))
            .bind(result.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn get_client(&self, client_id: i64) -> DomainResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(&format!("{CLIENT_SELECT} WHERE c.client_id = ?"))
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_client_by_identifier_and_type(
        &self,
        identifier: &str,
        client_type: &str,
    ) -> DomainResult<Option<Client>> {
        let row: Option<ClientRow> =
            sqlx::query_as(&format!("{CLIENT_SELECT} WHERE c.identifier = ? AND t.name = ?"))
                .bind(identifier)
                .bind(client_type)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_clients(&self) -> DomainResult<Vec<Client>> {
        let rows: Vec<ClientRow> = sqlx::query_as(&format!("{CLIENT_SELECT} ORDER BY t.name, c.identifier"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_clients_by_type(&self, client_type_id: i64) -> DomainResult<Vec<Client>> {
        let rows: Vec<ClientRow> =
            sqlx::query_as(&format!("{CLIENT_SELECT} WHERE c.client_type_id = ? ORDER BY c.identifier"))
                .bind(client_type_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_child_clients(&self, parent_client_id: i64) -> DomainResult<Vec<Client>> {
        let rows: Vec<ClientRow> =
            sqlx::query_as(&format!("{CLIENT_SELECT} WHERE c.parent_client_id = ? ORDER BY c.client_id"))
                .bind(parent_client_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_client(&self, client: &Client) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE clients SET identifier = ?, client_type_id = ?, parent_client_id = ?, updated = ?
             WHERE client_id = ?",
        )
        .bind(&client.identifier)
        .bind(client.client_type_id())
        .bind(client.parent_client_id)
        .bind(client.updated.map(|t| t.to_rfc3339()))
        .bind(client.client_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ClientNotFound(client.client_id));
        }

        Ok(())
    }

    async fn delete_client(&self, client_id: i64) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM config_associations WHERE client_id = ?")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE clients SET parent_client_id = NULL WHERE parent_client_id = ?")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM clients WHERE client_id = ?")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ClientNotFound(client_id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn provision_client(
        &self,
        identifier: &str,
        client_type: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Client> {
        let created = now.to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO client_types (name, created) VALUES (?, ?) ON CONFLICT (name) DO NOTHING")
            .bind(client_type)
            .bind(&created)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO clients (identifier, client_type_id, created)
             SELECT ?, client_type_id, ? FROM client_types WHERE name = ?
             ON CONFLICT (identifier, client_type_id) DO NOTHING",
        )
        .bind(identifier)
        .bind(&created)
        .bind(client_type)
        .execute(&mut *tx)
        .await?;

        let row: ClientRow = sqlx::query_as(&format!("{CLIENT_SELECT} WHERE c.identifier = ? AND t.name = ?"))
            .bind(identifier)
            .bind(client_type)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    client_id: i64,
    identifier: String,
    parent_client_id: Option<i64>,
    created: String,
    updated: Option<String>,
    client_type_id: i64,
    client_type_name: String,
    client_type_created: String,
    client_type_updated: Option<String>,
}

impl TryFrom<ClientRow> for Client {
    type Error = DomainError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: row.client_id,
            identifier: row.identifier,
            client_type: ClientType {
                client_type_id: row.client_type_id,
                name: row.client_type_name,
                created: parse_datetime(&row.client_type_created)?,
                updated: parse_optional_datetime(row.client_type_updated)?,
            },
            parent_client_id: row.parent_client_id,
            created: parse_datetime(&row.created)?,
            updated: parse_optional_datetime(row.updated)?,
        })
    }
}
