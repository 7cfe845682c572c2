use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{QuizSession, QuizSet, SessionError, SlotKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a session's mutable state.
///
/// This mirrors the engine's `QuizSession` minus the quiz itself, so
/// repositories can serialize progress without duplicating question data.
/// Rehydration goes through `QuizSession::from_parts`, which re-validates
/// against the stored quiz; malformed rows never become a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub slot: SlotKey,
    pub current: usize,
    pub answers: Vec<Option<String>>,
    pub complete: bool,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Snapshot the engine state under `slot`.
    #[must_use]
    pub fn from_session(slot: SlotKey, session: &QuizSession, now: DateTime<Utc>) -> Self {
        Self {
            slot,
            current: session.current_index(),
            answers: session.answers().to_vec(),
            complete: session.is_complete(),
            updated_at: now,
        }
    }

    /// Rebuild a live session from this record and its stored quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CorruptState` when the record does not fit the
    /// quiz (wrong answer count, index out of bounds).
    pub fn into_session(self, quiz: QuizSet) -> Result<QuizSession, SessionError> {
        QuizSession::from_parts(quiz, self.answers, self.current, self.complete)
    }
}

/// Repository contract for stored quizzes.
///
/// `save_quiz` has replace semantics: storing under an occupied slot
/// discards the previous quiz and any session recorded against it, the
/// way the original overwrote its fixed browser-storage key.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist a quiz under `slot`, replacing any previous quiz there.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn save_quiz(
        &self,
        slot: &SlotKey,
        quiz: &QuizSet,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Fetch the quiz stored under `slot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the slot is empty, or
    /// `StorageError::Serialization` when the stored rows no longer form a
    /// valid quiz.
    async fn load_quiz(&self, slot: &SlotKey) -> Result<QuizSet, StorageError>;

    /// Remove the quiz (and dependent session) stored under `slot`.
    ///
    /// Deleting an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn delete_quiz(&self, slot: &SlotKey) -> Result<(), StorageError>;
}

/// Repository contract for session progress snapshots.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist or update the session snapshot for its slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_session(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// Fetch the session snapshot stored under `slot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no snapshot exists.
    async fn load_session(&self, slot: &SlotKey) -> Result<SessionRecord, StorageError>;

    /// Drop the session snapshot under `slot`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn clear_session(&self, slot: &SlotKey) -> Result<(), StorageError>;
}

/// Repository contract for generated study-notes documents.
#[async_trait]
pub trait NotesRepository: Send + Sync {
    /// Persist the notes body under `slot`, replacing any previous notes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the notes cannot be stored.
    async fn save_notes(
        &self,
        slot: &SlotKey,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Fetch the notes stored under `slot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the slot is empty.
    async fn load_notes(&self, slot: &SlotKey) -> Result<String, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<SlotKey, QuizSet>>>,
    sessions: Arc<Mutex<HashMap<SlotKey, SessionRecord>>>,
    notes: Arc<Mutex<HashMap<SlotKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn save_quiz(
        &self,
        slot: &SlotKey,
        quiz: &QuizSet,
        _now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut quizzes = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        quizzes.insert(slot.clone(), quiz.clone());
        // Replace semantics: the old quiz's session no longer applies.
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        sessions.remove(slot);
        Ok(())
    }

    async fn load_quiz(&self, slot: &SlotKey) -> Result<QuizSet, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(slot).cloned().ok_or(StorageError::NotFound)
    }

    async fn delete_quiz(&self, slot: &SlotKey) -> Result<(), StorageError> {
        let mut quizzes = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        quizzes.remove(slot);
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        sessions.remove(slot);
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn save_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(record.slot.clone(), record.clone());
        Ok(())
    }

    async fn load_session(&self, slot: &SlotKey) -> Result<SessionRecord, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(slot).cloned().ok_or(StorageError::NotFound)
    }

    async fn clear_session(&self, slot: &SlotKey) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(slot);
        Ok(())
    }
}

#[async_trait]
impl NotesRepository for InMemoryRepository {
    async fn save_notes(
        &self,
        slot: &SlotKey,
        body: &str,
        _now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .notes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(slot.clone(), body.to_owned());
        Ok(())
    }

    async fn load_notes(&self, slot: &SlotKey) -> Result<String, StorageError> {
        let guard = self
            .notes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(slot).cloned().ok_or(StorageError::NotFound)
    }
}

/// Aggregates the study repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub notes: Arc<dyn NotesRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let notes: Arc<dyn NotesRepository> = Arc::new(repo);
        Self {
            quizzes,
            sessions,
            notes,
        }
    }
}
