use quiz_core::model::SlotKey;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{SessionRecord, SessionRepository, StorageError};

fn idx_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn usize_from_i64(field: &'static str, v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn save_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let current = idx_i64("current index", record.current)?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
                INSERT INTO sessions (slot, current_idx, complete, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(slot) DO UPDATE SET
                    current_idx = excluded.current_idx,
                    complete = excluded.complete,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(record.slot.as_str())
        .bind(current)
        .bind(record.complete)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM session_answers WHERE slot = ?1")
            .bind(record.slot.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        // One row per question slot, NULL for unanswered, so rehydration
        // recovers the exact answer list length.
        for (q_idx, answer) in record.answers.iter().enumerate() {
            let q_idx = idx_i64("question index", q_idx)?;
            sqlx::query(
                r"
                    INSERT INTO session_answers (slot, question_idx, answer)
                    VALUES (?1, ?2, ?3)
                ",
            )
            .bind(record.slot.as_str())
            .bind(q_idx)
            .bind(answer.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)
    }

    async fn load_session(&self, slot: &SlotKey) -> Result<SessionRecord, StorageError> {
        let row = sqlx::query(
            r"
                SELECT current_idx, complete, updated_at
                FROM sessions
                WHERE slot = ?1
            ",
        )
        .bind(slot.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        let current = usize_from_i64("current_idx", row.try_get("current_idx").map_err(ser)?)?;
        let complete: bool = row.try_get("complete").map_err(ser)?;
        let updated_at = row.try_get("updated_at").map_err(ser)?;

        let answer_rows = sqlx::query(
            r"
                SELECT question_idx, answer
                FROM session_answers
                WHERE slot = ?1
                ORDER BY question_idx
            ",
        )
        .bind(slot.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut answers = Vec::with_capacity(answer_rows.len());
        for (expected, answer_row) in answer_rows.iter().enumerate() {
            let q_idx =
                usize_from_i64("question_idx", answer_row.try_get("question_idx").map_err(ser)?)?;
            if q_idx != expected {
                return Err(StorageError::Serialization(format!(
                    "answer slots are not contiguous at index {expected}"
                )));
            }
            answers.push(answer_row.try_get::<Option<String>, _>("answer").map_err(ser)?);
        }

        Ok(SessionRecord {
            slot: slot.clone(),
            current,
            answers,
            complete,
            updated_at,
        })
    }

    async fn clear_session(&self, slot: &SlotKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM sessions WHERE slot = ?1")
            .bind(slot.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
