use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Advance, QuizSession, QuizSet, Score, SlotKey};
use storage::repository::{
    QuizRepository, SessionRecord, SessionRepository, Storage, StorageError,
};

use crate::error::SessionFlowError;

/// Result of committing an answer through the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub is_complete: bool,
    pub score: Score,
}

/// Orchestrates the persistence round-trip around a `QuizSession`.
///
/// The engine stays storage-agnostic; this flow snapshots its state after
/// every committed mutation so a session survives navigating away and
/// back. Missing or malformed stored data never reaches the engine — it
/// surfaces as the invalid-quiz-data failure instead.
#[derive(Clone)]
pub struct SessionFlow {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl SessionFlow {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            sessions,
        }
    }

    #[must_use]
    pub fn with_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(clock, storage.quizzes.clone(), storage.sessions.clone())
    }

    /// Store a freshly generated quiz under `slot` and start a session on
    /// it.
    ///
    /// # Errors
    ///
    /// Returns `SessionFlowError::Storage` when persisting fails.
    pub async fn install(
        &self,
        slot: &SlotKey,
        quiz: QuizSet,
    ) -> Result<QuizSession, SessionFlowError> {
        self.quizzes
            .save_quiz(slot, &quiz, self.clock.now())
            .await?;
        let session = QuizSession::new(quiz);
        self.checkpoint(slot, &session).await?;
        Ok(session)
    }

    /// Rebuild the session stored under `slot`.
    ///
    /// A stored quiz without a session snapshot yields a fresh session; a
    /// snapshot restores position, committed answers, and completion.
    ///
    /// # Errors
    ///
    /// Returns `SessionFlowError::InvalidQuizData` when the quiz is absent
    /// or the stored state no longer fits it, and
    /// `SessionFlowError::Storage` for other storage failures.
    pub async fn resume(&self, slot: &SlotKey) -> Result<QuizSession, SessionFlowError> {
        let quiz = self.quizzes.load_quiz(slot).await.map_err(|e| match e {
            StorageError::NotFound | StorageError::Serialization(_) => {
                SessionFlowError::InvalidQuizData(e)
            }
            other => SessionFlowError::Storage(other),
        })?;

        match self.sessions.load_session(slot).await {
            Ok(record) => record.into_session(quiz).map_err(|e| {
                SessionFlowError::InvalidQuizData(StorageError::Serialization(e.to_string()))
            }),
            Err(StorageError::NotFound) => Ok(QuizSession::new(quiz)),
            Err(other) => Err(SessionFlowError::Storage(other)),
        }
    }

    /// Snapshot the current engine state under `slot`.
    ///
    /// # Errors
    ///
    /// Returns `SessionFlowError::Storage` when persisting fails.
    pub async fn checkpoint(
        &self,
        slot: &SlotKey,
        session: &QuizSession,
    ) -> Result<(), SessionFlowError> {
        let record = SessionRecord::from_session(slot.clone(), session, self.clock.now());
        self.sessions.save_session(&record).await?;
        Ok(())
    }

    /// Commit the pending answer and persist the result.
    ///
    /// # Errors
    ///
    /// Propagates the engine's submission errors (`NoAnswerSelected`,
    /// `AlreadyRevealed`, `SessionComplete`) and storage failures. The
    /// snapshot is only written after a successful submission.
    pub async fn submit_current(
        &self,
        slot: &SlotKey,
        session: &mut QuizSession,
    ) -> Result<AnswerOutcome, SessionFlowError> {
        let correct = session.submit_answer()?;
        self.checkpoint(slot, session).await?;
        Ok(AnswerOutcome {
            correct,
            is_complete: session.is_complete(),
            score: session.score(),
        })
    }

    /// Advance (or finish from the last question) and persist.
    ///
    /// # Errors
    ///
    /// Propagates the engine's navigation errors and storage failures.
    pub async fn advance(
        &self,
        slot: &SlotKey,
        session: &mut QuizSession,
    ) -> Result<Advance, SessionFlowError> {
        let step = session.advance()?;
        self.checkpoint(slot, session).await?;
        Ok(step)
    }

    /// Step back to the previous question and persist.
    ///
    /// # Errors
    ///
    /// Propagates the engine's navigation errors and storage failures.
    pub async fn step_back(
        &self,
        slot: &SlotKey,
        session: &mut QuizSession,
    ) -> Result<(), SessionFlowError> {
        session.step_back()?;
        self.checkpoint(slot, session).await?;
        Ok(())
    }

    /// Reset the session to its initial state and persist.
    ///
    /// # Errors
    ///
    /// Returns `SessionFlowError::Storage` when persisting fails.
    pub async fn restart(
        &self,
        slot: &SlotKey,
        session: &mut QuizSession,
    ) -> Result<(), SessionFlowError> {
        session.restart();
        self.checkpoint(slot, session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, SessionError};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn sample_quiz() -> QuizSet {
        QuizSet::new(vec![
            Question {
                prompt: "Q1".into(),
                options: vec!["A".into(), "B".into()],
                correct_answer: "A".into(),
                explanation: "a".into(),
            },
            Question {
                prompt: "Q2".into(),
                options: vec!["A".into(), "B".into()],
                correct_answer: "B".into(),
                explanation: "b".into(),
            },
        ])
        .unwrap()
    }

    fn flow() -> (SessionFlow, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        let flow = SessionFlow::new(fixed_clock(), repo.clone(), repo.clone());
        (flow, repo)
    }

    fn slot() -> SlotKey {
        SlotKey::new("converted-mcq").unwrap()
    }

    #[tokio::test]
    async fn install_then_resume_yields_a_fresh_session() {
        let (flow, _repo) = flow();
        let installed = flow.install(&slot(), sample_quiz()).await.unwrap();
        let resumed = flow.resume(&slot()).await.unwrap();
        assert_eq!(resumed, installed);
        assert_eq!(resumed.current_index(), 0);
        assert_eq!(resumed.answered_count(), 0);
    }

    #[tokio::test]
    async fn resume_restores_committed_progress() {
        let (flow, _repo) = flow();
        let mut session = flow.install(&slot(), sample_quiz()).await.unwrap();

        session.select_answer("A").unwrap();
        let outcome = flow.submit_current(&slot(), &mut session).await.unwrap();
        assert!(outcome.correct);
        assert!(!outcome.is_complete);
        flow.advance(&slot(), &mut session).await.unwrap();

        let resumed = flow.resume(&slot()).await.unwrap();
        assert_eq!(resumed, session);
        assert_eq!(resumed.current_index(), 1);
        assert_eq!(resumed.answer_at(0), Some("A"));
    }

    #[tokio::test]
    async fn resume_without_stored_quiz_is_invalid_quiz_data() {
        let (flow, _repo) = flow();
        assert!(matches!(
            flow.resume(&slot()).await.unwrap_err(),
            SessionFlowError::InvalidQuizData(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn failed_submission_is_not_checkpointed() {
        let (flow, repo) = flow();
        let mut session = flow.install(&slot(), sample_quiz()).await.unwrap();

        let err = flow
            .submit_current(&slot(), &mut session)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionFlowError::Session(SessionError::NoAnswerSelected)
        ));

        let record = repo.load_session(&slot()).await.unwrap();
        assert!(record.answers.iter().all(Option::is_none));
    }

    #[tokio::test]
    async fn restart_clears_the_stored_snapshot_too() {
        let (flow, _repo) = flow();
        let mut session = flow.install(&slot(), sample_quiz()).await.unwrap();

        session.select_answer("B").unwrap();
        flow.submit_current(&slot(), &mut session).await.unwrap();
        flow.restart(&slot(), &mut session).await.unwrap();

        let resumed = flow.resume(&slot()).await.unwrap();
        assert_eq!(resumed.answered_count(), 0);
        assert_eq!(resumed.current_index(), 0);
        assert!(!resumed.is_complete());
    }
}
