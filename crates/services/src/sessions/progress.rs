use quiz_core::model::QuizSession;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let total = session.total();
        let answered = session.answered_count();
        Self {
            total,
            answered,
            remaining: total - answered,
            is_complete: session.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuizSet};

    fn session() -> QuizSession {
        let quiz = QuizSet::new(vec![
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
        .unwrap();
        QuizSession::new(quiz)
    }

    #[test]
    fn tracks_answered_and_remaining() {
        let mut s = session();
        assert_eq!(
            SessionProgress::from_session(&s),
            SessionProgress {
                total: 2,
                answered: 0,
                remaining: 2,
                is_complete: false,
            }
        );

        s.select_answer("A").unwrap();
        s.submit_answer().unwrap();
        let progress = SessionProgress::from_session(&s);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
    }
}
