//! SQLite implementation of the CheckInRepository.

use async_trait::async_trait;

use super::{parse_datetime, SqliteStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CheckIn, CheckInDetail, NewCheckIn};
use crate::domain::ports::CheckInRepository;

#[async_trait]
impl CheckInRepository for SqliteStore {
    async fn insert_check_in(&self, check_in: &NewCheckIn) -> DomainResult<CheckIn> {
        let result = sqlx::query("INSERT INTO check_ins (client_id, extra_data, check_in_time) VALUES (?, ?, ?)")
            .bind(check_in.client_id)
            .bind(&check_in.extra_data)
            .bind(check_in.check_in_time.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(CheckIn {
            check_in_id: result.last_insert_rowid(),
            client_id: check_in.client_id,
            extra_data: check_in.extra_data.clone(),
            check_in_time: check_in.check_in_time,
        })
    }

    async fn list_recent_check_ins(&self, limit: u32) -> DomainResult<Vec<CheckInDetail>> {
        let rows: Vec<CheckInRow> = sqlx::query_as(
            "SELECT k.check_in_id, k.client_id, k.extra_data, k.check_in_time, c.identifier, t.name AS client_type
             FROM check_ins k
             JOIN clients c ON c.client_id = k.client_id
             JOIN client_types t ON t.client_type_id = c.client_type_id
             ORDER BY k.check_in_time DESC, k.check_in_id DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct CheckInRow {
    check_in_id: i64,
    client_id: i64,
    extra_data: Option<String>,
    check_in_time: String,
    identifier: String,
    client_type: String,
}

impl TryFrom<CheckInRow> for CheckInDetail {
    type Error = DomainError;

    fn try_from(row: CheckInRow) -> Result<Self, Self::Error> {
        Ok(Self {
            check_in: CheckIn {
                check_in_id: row.check_in_id,
                client_id: row.client_id,
                extra_data: row.extra_data,
                check_in_time: parse_datetime(&row.check_in_time)?,
            },
            identifier: row.identifier,
            client_type: row.client_type,
        })
    }
}
