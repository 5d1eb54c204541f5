//! SQLite implementation of the ClientTypeRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{parse_datetime, parse_optional_datetime, SqliteStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ClientType;
use crate::domain::ports::ClientTypeRepository;

const CLIENT_TYPE_COLUMNS: &str = "client_type_id, name, created, updated";

#[async_trait]
impl ClientTypeRepository for SqliteStore {
    async fn insert_client_type(&self, name: &str, created: DateTime<Utc>) -> DomainResult<ClientType> {
        let result = sqlx::query("INSERT INTO client_types (name, created) VALUES (?, ?)")
            .bind(name)
            .bind(created.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(ClientType {
            client_type_id: result.last_insert_rowid(),
            name: name.to_string(),
            created,
            updated: None,
        })
    }

    async fn get_client_type(&self, client_type_id: i64) -> DomainResult<Option<ClientType>> {
        let row: Option<ClientTypeRow> =
            sqlx::query_as(&format!("SELECT {CLIENT_TYPE_COLUMNS} FROM client_types WHERE client_type_id = ?"))
                .bind(client_type_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_client_type_by_name(&self, name: &str) -> DomainResult<Option<ClientType>> {
        let row: Option<ClientTypeRow> =
            sqlx::query_as(&format!("SELECT {CLIENT_TYPE_COLUMNS} FROM client_types WHERE name = ?"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_client_types(&self) -> DomainResult<Vec<ClientType>> {
        let rows: Vec<ClientTypeRow> =
            sqlx::query_as(&format!("SELECT {CLIENT_TYPE_COLUMNS} FROM client_types ORDER BY name"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_client_type(&self, client_type: &ClientType) -> DomainResult<()> {
        let result = sqlx::query("UPDATE client_types SET name = ?, updated = ? WHERE client_type_id = ?")
            .bind(&client_type.name)
            .bind(client_type.updated.map(|t| t.to_rfc3339()))
            .bind(client_type.client_type_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ClientTypeNotFound(client_type.client_type_id));
        }

        Ok(())
    }

    async fn delete_client_type(&self, client_type_id: i64) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM config_associations
             WHERE client_id IN (SELECT client_id FROM clients WHERE client_type_id = ?)",
        )
        .bind(client_type_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM clients WHERE client_type_id = ?")
            .bind(client_type_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM client_types WHERE client_type_id = ?")
            .bind(client_type_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ClientTypeNotFound(client_type_id));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ClientTypeRow {
    client_type_id: i64,
    name: String,
    created: String,
    updated: Option<String>,
}

impl TryFrom<ClientTypeRow> for ClientType {
    type Error = DomainError;

    fn try_from(row: ClientTypeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            client_type_id: row.client_type_id,
            name: row.name,
            created: parse_datetime(&row.created)?,
            updated: parse_optional_datetime(row.updated)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_test_store;
    use crate::domain::models::NewClient;
    use crate::domain::ports::ClientRepository;

    #[tokio::test]
    async fn test_insert_and_find_client_type() {
        let store = create_test_store().await.unwrap();
        let created = store.insert_client_type("Kiosk", Utc::now()).await.unwrap();
        assert!(created.client_type_id > 0);

        let found = store.find_client_type_by_name("Kiosk").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(found.updated.is_none());
        assert!(store.find_client_type_by_name("kiosk").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let store = create_test_store().await.unwrap();
        store.insert_client_type("Kiosk", Utc::now()).await.unwrap();
        let err = store.insert_client_type("Kiosk", Utc::now()).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_clients() {
        let store = create_test_store().await.unwrap();
        let kiosk = store.insert_client_type("Kiosk", Utc::now()).await.unwrap();
        let client = store
            .insert_client(&NewClient {
                identifier: "k-1".to_string(),
                client_type_id: kiosk.client_type_id,
                parent_client_id: None,
                created: Utc::now(),
            })
            .await
            .unwrap();

        store.delete_client_type(kiosk.client_type_id).await.unwrap();

        assert!(store.get_client(client.client_id).await.unwrap().is_none());
        assert!(store.get_client_type(kiosk.client_type_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = create_test_store().await.unwrap();
        let missing = ClientType {
            client_type_id: 42,
            name: "Ghost".to_string(),
            created: Utc::now(),
            updated: Some(Utc::now()),
        };
        assert!(matches!(
            store.update_client_type(&missing).await,
            Err(DomainError::ClientTypeNotFound(42))
        ));
        assert!(matches!(
            store.delete_client_type(42).await,
            Err(DomainError::ClientTypeNotFound(42))
        ));
    }
}
