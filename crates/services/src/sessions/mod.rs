mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionFlowError;
pub use progress::SessionProgress;
pub use view::{OptionMarker, OptionView, QuestionView, ScoreView};
pub use workflow::{AnswerOutcome, SessionFlow};
