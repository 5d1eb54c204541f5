//! SQLite implementation of the ConfigRepository.

use async_trait::async_trait;

use super::{parse_datetime, parse_optional_datetime, SqliteStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Config, NewConfig};
use crate::domain::ports::ConfigRepository;

const CONFIG_COLUMNS: &str = "config_id, config_key, config_value, created, updated";

#[async_trait]
impl ConfigRepository for SqliteStore {
    async fn insert_config(&self, config: &NewConfig) -> DomainResult<Config> {
        let result = sqlx::query("INSERT INTO configs (config_key, config_value, created) VALUES (?, ?, ?)")
            .bind(&config.key)
            .bind(&config.value)
            .bind(config.created.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(Config {
            config_id: result.last_insert_rowid(),
            key: config.key.clone(),
            value: config.value.clone(),
            created: config.created,
            updated: None,
        })
    }

    async fn get_config(&self, config_id: i64) -> DomainResult<Option<Config>> {
        let row: Option<ConfigRow> =
            sqlx::query_as(&format!("SELECT {CONFIG_COLUMNS} FROM configs WHERE config_id = ?"))
                .bind(config_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_config_by_key(&self, key: &str) -> DomainResult<Option<Config>> {
        let row: Option<ConfigRow> =
            sqlx::query_as(&format!("SELECT {CONFIG_COLUMNS} FROM configs WHERE config_key = ?"))
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_all_configs(&self) -> DomainResult<Vec<Config>> {
        let rows: Vec<ConfigRow> = sqlx::query_as(&format!("SELECT {CONFIG_COLUMNS} FROM configs ORDER BY config_key"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_config(&self, config: &Config) -> DomainResult<()> {
        let result = sqlx::query("UPDATE configs SET config_key = ?, config_value = ?, updated = ? WHERE config_id = ?")
            .bind(&config.key)
            .bind(&config.value)
            .bind(config.updated.map(|t| t.to_rfc3339()))
            .bind(config.config_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConfigNotFound(config.config_id));
        }

        Ok(())
    }

    async fn delete_config(&self, config_id: i64) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM config_associations WHERE config_id = ?")
            .bind(config_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM configs WHERE config_id = ?")
            .bind(config_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConfigNotFound(config_id));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ConfigRow {
    config_id: i64,
    config_key: String,
    config_value: String,
    created: String,
    updated: Option<String>,
}

impl TryFrom<ConfigRow> for Config {
    type Error = DomainError;

    fn try_from(row: ConfigRow) -> Result<Self, Self::Error> {
        Ok(Self {
            config_id: row.config_id,
            key: row.config_key,
            value: row.config_value,
            created: parse_datetime(&row.created)?,
            updated: parse_optional_datetime(row.updated)?,
        })
    }
}
