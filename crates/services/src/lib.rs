#![forbid(unsafe_code)]

pub mod error;
pub mod generation;
pub mod notes;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{GenerationError, NotesError, SessionFlowError};
pub use generation::{Difficulty, GenerationClient, GenerationConfig};
pub use notes::NotesService;
pub use sessions::{
    AnswerOutcome, OptionMarker, OptionView, QuestionView, ScoreView, SessionFlow, SessionProgress,
};
