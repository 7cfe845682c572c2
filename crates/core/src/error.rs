use thiserror::Error;

use crate::model::quiz::QuizDataError;
use crate::model::session::SessionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    QuizData(#[from] QuizDataError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
