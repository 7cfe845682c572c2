use chrono::{DateTime, Utc};
use quiz_core::model::SlotKey;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{NotesRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl NotesRepository for SqliteRepository {
    async fn save_notes(
        &self,
        slot: &SlotKey,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO notes (slot, body, created_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(slot) DO UPDATE SET
                    body = excluded.body,
                    created_at = excluded.created_at
            ",
        )
        .bind(slot.as_str())
        .bind(body)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn load_notes(&self, slot: &SlotKey) -> Result<String, StorageError> {
        let row = sqlx::query("SELECT body FROM notes WHERE slot = ?1")
            .bind(slot.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?
            .ok_or(StorageError::NotFound)?;
        row.try_get("body")
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}
