use thiserror::Error;

use crate::model::question::{Question, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejection reasons for externally supplied quiz data.
///
/// This is the only gate between the generation/persistence collaborators
/// and the session engine; everything behind it can assume a well-formed
/// quiz.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDataError {
    #[error("quiz contains no questions")]
    Empty,

    #[error("invalid question at index {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── QUIZ SET ──────────────────────────────────────────────────────────────────
//

/// Immutable, validated collection of questions loaded into a session.
///
/// Construction is the `load` validation step: an empty sequence or a
/// malformed question is rejected here, never surfaced as undefined engine
/// state later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSet {
    questions: Vec<Question>,
}

impl QuizSet {
    /// Validates and wraps a list of questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizDataError::Empty` for an empty list, or
    /// `QuizDataError::Question` naming the first malformed question.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizDataError> {
        if questions.is_empty() {
            return Err(QuizDataError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|source| QuizDataError::Question { index, source })?;
        }
        Ok(Self { questions })
    }

    /// Number of questions in the quiz, always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Kept for `len`/`is_empty` pairing; a constructed set is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions, in order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question at `index`, if any.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}
