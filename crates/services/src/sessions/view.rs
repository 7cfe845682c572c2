use quiz_core::model::{QuizSession, Score};

/// How one option should be rendered.
///
/// Derived from the reveal state plus the committed answer: before reveal
/// only the pending selection is highlighted; after reveal the correct
/// option and a wrong selection are marked, everything else stays neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMarker {
    Neutral,
    Selected,
    Correct,
    Incorrect,
}

/// One renderable option row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub text: String,
    pub marker: OptionMarker,
}

/// Presentation-agnostic snapshot of the current question.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling assumptions
///
/// The affordance flags tell the presentation layer which actions are
/// legal, so it never offers a transition the engine would reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    /// Explanation text, present only once the question is revealed.
    pub explanation: Option<String>,
    pub is_last: bool,
    pub can_submit: bool,
    pub can_advance: bool,
    pub can_step_back: bool,
}

impl QuestionView {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let question = session.current_question();
        let revealed = session.is_revealed();
        let complete = session.is_complete();
        let pending = session.pending_answer();
        let committed = session.committed_answer();

        let options = question
            .options
            .iter()
            .map(|text| {
                let marker = if revealed {
                    if question.is_correct(text) {
                        OptionMarker::Correct
                    } else if committed == Some(text.as_str()) {
                        OptionMarker::Incorrect
                    } else {
                        OptionMarker::Neutral
                    }
                } else if pending == Some(text.as_str()) {
                    OptionMarker::Selected
                } else {
                    OptionMarker::Neutral
                };
                OptionView {
                    text: text.clone(),
                    marker,
                }
            })
            .collect();

        Self {
            index: session.current_index(),
            total: session.total(),
            prompt: question.prompt.clone(),
            options,
            explanation: revealed.then(|| question.explanation.clone()),
            is_last: session.current_index() + 1 == session.total(),
            can_submit: !complete && !revealed && pending.is_some(),
            can_advance: !complete && revealed,
            can_step_back: !complete && session.current_index() > 0,
        }
    }
}

/// Final or running score for the summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreView {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
}

impl ScoreView {
    #[must_use]
    pub fn from_score(score: Score) -> Self {
        Self {
            correct: score.correct(),
            total: score.total(),
            percent: score.percent(),
        }
    }

    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        Self::from_score(session.score())
    }
}
