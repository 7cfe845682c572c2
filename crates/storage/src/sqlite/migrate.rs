use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema (quizzes with questions and options, session
/// snapshots with per-question answers, and notes).
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS quizzes (
                    slot TEXT PRIMARY KEY,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    slot TEXT NOT NULL,
                    idx INTEGER NOT NULL CHECK (idx >= 0),
                    prompt TEXT NOT NULL,
                    answer TEXT NOT NULL,
                    explanation TEXT NOT NULL,
                    PRIMARY KEY (slot, idx),
                    FOREIGN KEY (slot) REFERENCES quizzes(slot) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS question_options (
                    slot TEXT NOT NULL,
                    question_idx INTEGER NOT NULL,
                    idx INTEGER NOT NULL CHECK (idx >= 0),
                    option_text TEXT NOT NULL,
                    PRIMARY KEY (slot, question_idx, idx),
                    FOREIGN KEY (slot, question_idx)
                        REFERENCES questions(slot, idx) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS sessions (
                    slot TEXT PRIMARY KEY,
                    current_idx INTEGER NOT NULL CHECK (current_idx >= 0),
                    complete INTEGER NOT NULL CHECK (complete IN (0, 1)),
                    updated_at TEXT NOT NULL,
                    FOREIGN KEY (slot) REFERENCES quizzes(slot) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS session_answers (
                    slot TEXT NOT NULL,
                    question_idx INTEGER NOT NULL CHECK (question_idx >= 0),
                    answer TEXT,
                    PRIMARY KEY (slot, question_idx),
                    FOREIGN KEY (slot) REFERENCES sessions(slot) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS notes (
                    slot TEXT PRIMARY KEY,
                    body TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (1, ?1)")
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
    }

    Ok(())
}
