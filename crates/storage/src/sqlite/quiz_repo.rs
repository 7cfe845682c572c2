use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuizSet, SlotKey};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{QuizRepository, StorageError};

fn idx_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn save_quiz(
        &self,
        slot: &SlotKey,
        quiz: &QuizSet,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        // Replace semantics: cascade wipes questions, options, and any
        // session recorded against the old quiz.
        sqlx::query("DELETE FROM quizzes WHERE slot = ?1")
            .bind(slot.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        sqlx::query("INSERT INTO quizzes (slot, created_at) VALUES (?1, ?2)")
            .bind(slot.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (q_idx, question) in quiz.questions().iter().enumerate() {
            let q_idx = idx_i64("question index", q_idx)?;
            sqlx::query(
                r"
                    INSERT INTO questions (slot, idx, prompt, answer, explanation)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )
            .bind(slot.as_str())
            .bind(q_idx)
            .bind(&question.prompt)
            .bind(&question.correct_answer)
            .bind(&question.explanation)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

            for (o_idx, option) in question.options.iter().enumerate() {
                let o_idx = idx_i64("option index", o_idx)?;
                sqlx::query(
                    r"
                        INSERT INTO question_options (slot, question_idx, idx, option_text)
                        VALUES (?1, ?2, ?3, ?4)
                    ",
                )
                .bind(slot.as_str())
                .bind(q_idx)
                .bind(o_idx)
                .bind(option)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)
    }

    async fn load_quiz(&self, slot: &SlotKey) -> Result<QuizSet, StorageError> {
        let quiz_row = sqlx::query("SELECT slot FROM quizzes WHERE slot = ?1")
            .bind(slot.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        if quiz_row.is_none() {
            return Err(StorageError::NotFound);
        }

        let question_rows = sqlx::query(
            r"
                SELECT idx, prompt, answer, explanation
                FROM questions
                WHERE slot = ?1
                ORDER BY idx
            ",
        )
        .bind(slot.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut questions = Vec::with_capacity(question_rows.len());
        for row in &question_rows {
            let q_idx: i64 = row.try_get("idx").map_err(ser)?;
            let option_rows = sqlx::query(
                r"
                    SELECT option_text
                    FROM question_options
                    WHERE slot = ?1 AND question_idx = ?2
                    ORDER BY idx
                ",
            )
            .bind(slot.as_str())
            .bind(q_idx)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

            let mut options = Vec::with_capacity(option_rows.len());
            for option_row in &option_rows {
                options.push(option_row.try_get::<String, _>("option_text").map_err(ser)?);
            }

            questions.push(Question {
                prompt: row.try_get("prompt").map_err(ser)?,
                options,
                correct_answer: row.try_get("answer").map_err(ser)?,
                explanation: row.try_get("explanation").map_err(ser)?,
            });
        }

        // Domain validation on rehydration: rows that no longer form a
        // valid quiz surface as a serialization failure, not a live quiz.
        QuizSet::new(questions).map_err(ser)
    }

    async fn delete_quiz(&self, slot: &SlotKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM quizzes WHERE slot = ?1")
            .bind(slot.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
