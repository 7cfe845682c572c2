//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizDataError, SessionError};
use storage::repository::StorageError;

/// Errors emitted by `GenerationClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("content generation is not configured")]
    Disabled,

    #[error("generation service returned an empty response")]
    EmptyResponse,

    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("malformed generation payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidQuiz(#[from] QuizDataError),

    #[error("only PDF documents are accepted: {file_name}")]
    UnsupportedDocument { file_name: String },

    #[error("document upload failed: {0}")]
    UploadFailed(String),
}

/// Errors emitted by `SessionFlow`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionFlowError {
    /// The stored quiz is absent or no longer parses into a valid quiz.
    /// Non-retryable without new input; the caller sends the user back to
    /// the upload/generation step.
    #[error("stored quiz is missing or malformed; regenerate it")]
    InvalidQuizData(#[source] StorageError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NotesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotesError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
