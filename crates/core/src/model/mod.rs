mod ids;
pub mod question;
pub mod quiz;
pub mod session;

pub use ids::{ParseSlotKeyError, SlotKey};
pub use question::{Question, QuestionError};
pub use quiz::{QuizDataError, QuizSet};
pub use session::{Advance, QuizSession, Score, SessionError, SessionPhase};
