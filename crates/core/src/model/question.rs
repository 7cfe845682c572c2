use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One multiple-choice question as produced by the content-generation
/// collaborator.
///
/// The serde field names match the generation wire format exactly:
/// `{"question", "options", "answer", "explanation"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "answer")]
    pub correct_answer: String,
    pub explanation: String,
}

impl Question {
    /// Checks that the question is answerable.
    ///
    /// Correctness is always decided by exact string equality against
    /// `correct_answer`, so an answer that matches none of the options would
    /// make the question impossible to get right.
    ///
    /// Duplicate option text is accepted; every copy of the correct string
    /// counts as correct under string-equality scoring.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is blank, the option list is
    /// empty, or the correct answer is not among the options.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::BlankPrompt);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(QuestionError::AnswerNotInOptions {
                answer: self.correct_answer.clone(),
            });
        }
        Ok(())
    }

    /// Returns true when `candidate` matches the correct answer exactly.
    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.correct_answer == candidate
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is blank")]
    BlankPrompt,

    #[error("question has no options")]
    NoOptions,

    #[error("correct answer {answer:?} is not among the options")]
    AnswerNotInOptions { answer: String },
}
