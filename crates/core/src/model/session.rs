use thiserror::Error;

use crate::model::question::Question;
use crate::model::quiz::QuizSet;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected session transitions.
///
/// `NoAnswerSelected` is a user-visible affordance gap (nothing picked yet);
/// the remaining variants are contract violations a well-behaved
/// presentation layer never triggers, because it reads the affordance flags
/// before offering an action. All of them leave the session untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no answer selected for the current question")]
    NoAnswerSelected,

    #[error("current question is already revealed")]
    AlreadyRevealed,

    #[error("current question has not been revealed yet")]
    NotRevealed,

    #[error("already at the first question")]
    AtFirstQuestion,

    #[error("session is complete; restart to continue")]
    SessionComplete,

    #[error("persisted session state does not match the quiz: {0}")]
    CorruptState(String),
}

//
// ─── SESSION TYPES ─────────────────────────────────────────────────────────────
//

/// Explicit phase of a session, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Working through questions; `revealed` tells whether the current
    /// question's result is showing.
    Answering { revealed: bool },
    /// The user finished the quiz after viewing the last result. Terminal
    /// until `restart`.
    Complete,
}

/// Outcome of a successful `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    Moved,
    /// Advanced past the last question; the session is now complete.
    Finished,
}

/// Running or final score of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    correct: usize,
    total: usize,
}

impl Score {
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Percentage of correct answers, rounded to the nearest integer.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
    }
}

//
// ─── SESSION ENGINE ────────────────────────────────────────────────────────────
//

/// Mutable per-user progress through a `QuizSet`.
///
/// The quiz itself is read-only; the session owns the current position, the
/// pending (selected-but-not-submitted) answer, the committed answers, and
/// the completion flag. A question is *revealed* once its answer has been
/// committed, which also freezes that answer until `restart`.
///
/// There is no uninitialized state: a session can only be obtained from an
/// already-validated `QuizSet`, so every operation runs against well-formed
/// data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    quiz: QuizSet,
    current: usize,
    answers: Vec<Option<String>>,
    pending: Option<String>,
    complete: bool,
}

impl QuizSession {
    /// Starts a fresh session at the first question with no answers recorded.
    #[must_use]
    pub fn new(quiz: QuizSet) -> Self {
        let answers = vec![None; quiz.len()];
        Self {
            quiz,
            current: 0,
            answers,
            pending: None,
            complete: false,
        }
    }

    /// Rehydrates a session from persisted state.
    ///
    /// The pending answer is re-derived from the committed answer at
    /// `current`, the same restoration rule navigation uses.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CorruptState` when the answer list length does
    /// not match the quiz or `current` is out of bounds.
    pub fn from_parts(
        quiz: QuizSet,
        answers: Vec<Option<String>>,
        current: usize,
        complete: bool,
    ) -> Result<Self, SessionError> {
        if answers.len() != quiz.len() {
            return Err(SessionError::CorruptState(format!(
                "{} answers recorded for {} questions",
                answers.len(),
                quiz.len()
            )));
        }
        if current >= quiz.len() {
            return Err(SessionError::CorruptState(format!(
                "current index {current} out of bounds for {} questions",
                quiz.len()
            )));
        }
        let pending = answers[current].clone();
        Ok(Self {
            quiz,
            current,
            answers,
            pending,
            complete,
        })
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz(&self) -> &QuizSet {
        &self.quiz
    }

    /// Index of the current question, always within bounds.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Total number of questions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.quiz.len()
    }

    /// The question at the current position.
    ///
    /// # Panics
    ///
    /// Never panics: `current` is maintained within bounds by construction.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.quiz.questions()[self.current]
    }

    /// Whether the current question's result is showing.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.answers[self.current].is_some()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.complete {
            SessionPhase::Complete
        } else {
            SessionPhase::Answering {
                revealed: self.is_revealed(),
            }
        }
    }

    /// The selected-but-not-necessarily-committed answer for the current
    /// question.
    #[must_use]
    pub fn pending_answer(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// The committed answer for the current question.
    #[must_use]
    pub fn committed_answer(&self) -> Option<&str> {
        self.answer_at(self.current)
    }

    /// The committed answer at `index`, if any was submitted.
    #[must_use]
    pub fn answer_at(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    /// All committed answers, one slot per question.
    #[must_use]
    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    /// Number of questions with a committed answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Progress through the quiz in `[0.0, 1.0]`: the current question
    /// counts once its result is revealed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        let revealed = usize::from(self.is_revealed());
        (self.current + revealed) as f64 / self.quiz.len() as f64
    }

    /// Score over all questions; unanswered slots count as incorrect.
    #[must_use]
    pub fn score(&self) -> Score {
        let correct = self
            .quiz
            .questions()
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| {
                answer.as_deref().is_some_and(|a| question.is_correct(a))
            })
            .count();
        Score {
            correct,
            total: self.quiz.len(),
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Selects `option` as the pending answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionComplete` after completion and
    /// `SessionError::AlreadyRevealed` once the current question's answer is
    /// committed; a revealed answer can only change via `restart`.
    pub fn select_answer(&mut self, option: impl Into<String>) -> Result<(), SessionError> {
        if self.complete {
            return Err(SessionError::SessionComplete);
        }
        if self.is_revealed() {
            return Err(SessionError::AlreadyRevealed);
        }
        self.pending = Some(option.into());
        Ok(())
    }

    /// Commits the pending answer and reveals the current question.
    ///
    /// Returns whether the committed answer is correct.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAnswerSelected` without a pending choice,
    /// `SessionError::AlreadyRevealed` on double submission, and
    /// `SessionError::SessionComplete` after completion. The answer list is
    /// untouched on every error path.
    pub fn submit_answer(&mut self) -> Result<bool, SessionError> {
        if self.complete {
            return Err(SessionError::SessionComplete);
        }
        if self.is_revealed() {
            return Err(SessionError::AlreadyRevealed);
        }
        let Some(choice) = self.pending.clone() else {
            return Err(SessionError::NoAnswerSelected);
        };
        let correct = self.current_question().is_correct(&choice);
        self.answers[self.current] = Some(choice);
        Ok(correct)
    }

    /// Moves to the next question, or completes the session from the last
    /// one.
    ///
    /// On a plain move the new question's pending answer is restored from
    /// whatever was previously committed there, so revisited questions show
    /// their earlier state instead of re-prompting.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` while the current question is
    /// unanswered and `SessionError::SessionComplete` after completion.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.complete {
            return Err(SessionError::SessionComplete);
        }
        if !self.is_revealed() {
            return Err(SessionError::NotRevealed);
        }
        if self.current + 1 == self.quiz.len() {
            self.complete = true;
            return Ok(Advance::Finished);
        }
        self.current += 1;
        self.pending = self.answers[self.current].clone();
        Ok(Advance::Moved)
    }

    /// Moves back to the previous question, restoring its recorded state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AtFirstQuestion` at index 0 and
    /// `SessionError::SessionComplete` after completion; the session is
    /// unchanged in both cases. Review of a finished quiz goes through
    /// `restart`, not backwards navigation.
    pub fn step_back(&mut self) -> Result<(), SessionError> {
        if self.complete {
            return Err(SessionError::SessionComplete);
        }
        if self.current == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.current -= 1;
        self.pending = self.answers[self.current].clone();
        Ok(())
    }

    /// Resets the session to its initial state; the quiz is untouched.
    pub fn restart(&mut self) {
        self.current = 0;
        self.answers = vec![None; self.quiz.len()];
        self.pending = None;
        self.complete = false;
    }
}
