//! Per-visitor riddle state machine.
//!
//! ```text
//! NoQuestion ──issue──▶ QuestionIssued ──correct──▶ Unlocked
//!                         ▲    │ wrong                 │
//!                         │    └──────┘                │
//!                         └──────────── issue ─────────┘
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use sphinx_common::{IssuedQuestion, SolveOutcome, normalize_answer};

use super::RiddleBank;

/// Riddle state carried by the visitor between requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiddleSessionState {
    /// Normalized answer to the most recently issued question
    pub expected_answer: Option<String>,
    /// Set once the current question has been answered correctly
    pub unlocked: bool,
    /// Rotation index of the last issued category (-1 = none yet)
    pub last_category_index: i64,
}

impl Default for RiddleSessionState {
    fn default() -> Self {
        Self {
            expected_answer: None,
            unlocked: false,
            last_category_index: -1,
        }
    }
}

/// Observable phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiddlePhase {
    NoQuestion,
    QuestionIssued,
    Unlocked,
}

impl RiddleSessionState {
    /// Gate check. Reads only.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn phase(&self) -> RiddlePhase {
        match (&self.expected_answer, self.unlocked) {
            (_, true) => RiddlePhase::Unlocked,
            (Some(_), false) => RiddlePhase::QuestionIssued,
            (None, false) => RiddlePhase::NoQuestion,
        }
    }
}

/// Issue the next question in the category rotation.
///
/// Overwrites any previous expected answer and relocks the session. The
/// returned question never carries the answer.
pub fn issue_question<R: Rng>(
    state: RiddleSessionState,
    bank: &RiddleBank,
    rng: &mut R,
) -> (RiddleSessionState, IssuedQuestion) {
    let (category, index) = bank.cycler().next(state.last_category_index);
    let entry = bank.pick(category, rng);

    tracing::debug!(category = %category, index = index, "Issued riddle");

    let next = RiddleSessionState {
        expected_answer: Some(normalize_answer(&entry.answer)),
        unlocked: false,
        last_category_index: index,
    };

    let question = IssuedQuestion {
        question: entry.question.clone(),
        category: category.to_string(),
    };

    (next, question)
}

/// Check a guess against the current question.
///
/// Without an issued question the state is returned untouched with a
/// `no-riddle` outcome. A wrong guess leaves the state untouched and may be
/// retried any number of times.
pub fn submit_answer(state: RiddleSessionState, guess: &str) -> (RiddleSessionState, SolveOutcome) {
    let Some(expected) = state.expected_answer.as_deref() else {
        return (state, SolveOutcome::no_riddle());
    };

    if normalize_answer(guess) == expected {
        tracing::info!(category_index = state.last_category_index, "Riddle solved");
        let next = RiddleSessionState {
            unlocked: true,
            ..state
        };
        (next, SolveOutcome::solved())
    } else {
        tracing::debug!(category_index = state.last_category_index, "Riddle guess rejected");
        (state, SolveOutcome::mismatch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sphinx_common::RiddleEntry;

    fn factorial_bank() -> RiddleBank {
        RiddleBank::from_entries(
            vec!["mathematics".to_string()],
            vec![RiddleEntry::new("mathematics", "What is 7 factorial (7!)?", "5040")],
        )
        .unwrap()
    }

    #[test]
    fn test_default_is_no_question() {
        let state = RiddleSessionState::default();
        assert_eq!(state.phase(), RiddlePhase::NoQuestion);
        assert_eq!(state.last_category_index, -1);
        assert!(!state.is_unlocked());
    }

    #[test]
    fn test_submit_without_question() {
        let state = RiddleSessionState::default();
        let (next, outcome) = submit_answer(state.clone(), "anything");
        assert_eq!(outcome, SolveOutcome::no_riddle());
        assert_eq!(next, state);
    }

    #[test]
    fn test_wrong_then_right_answer() {
        let bank = factorial_bank();
        let mut rng = StdRng::seed_from_u64(0);

        let (state, question) = issue_question(RiddleSessionState::default(), &bank, &mut rng);
        assert_eq!(question.category, "mathematics");
        assert_eq!(state.phase(), RiddlePhase::QuestionIssued);

        let (state, outcome) = submit_answer(state, "5,040");
        assert_eq!(outcome, SolveOutcome::mismatch());
        let (state, outcome) = submit_answer(state, "720");
        assert_eq!(outcome, SolveOutcome::mismatch());
        assert!(!state.is_unlocked());

        let (state, outcome) = submit_answer(state, " 5040 ");
        assert_eq!(outcome, SolveOutcome::solved());
        assert!(state.is_unlocked());
        assert_eq!(state.phase(), RiddlePhase::Unlocked);
    }

    #[test]
    fn test_new_question_relocks() {
        let bank = factorial_bank();
        let mut rng = StdRng::seed_from_u64(0);

        let (state, _) = issue_question(RiddleSessionState::default(), &bank, &mut rng);
        let (state, _) = submit_answer(state, "5040");
        assert!(state.is_unlocked());

        let (state, _) = issue_question(state, &bank, &mut rng);
        assert!(!state.is_unlocked());
        assert_eq!(state.phase(), RiddlePhase::QuestionIssued);
    }

    #[test]
    fn test_only_latest_question_is_solvable() {
        let bank = RiddleBank::from_entries(
            vec!["first".to_string(), "second".to_string()],
            vec![
                RiddleEntry::new("first", "What is 2 + 2?", "4"),
                RiddleEntry::new("second", "What is 3 * 3?", "9"),
            ],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let (state, q1) = issue_question(RiddleSessionState::default(), &bank, &mut rng);
        assert_eq!(q1.category, "first");
        let (state, q2) = issue_question(state, &bank, &mut rng);
        assert_eq!(q2.category, "second");

        let (state, outcome) = submit_answer(state, "4");
        assert!(!outcome.ok);
        let (_, outcome) = submit_answer(state, "9");
        assert!(outcome.ok);
    }

    #[test]
    fn test_rotation_is_cyclic() {
        let bank = RiddleBank::builtin();
        let n = bank.categories().len() as i64;
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = RiddleSessionState::default();

        for round in 0..(2 * n + 3) {
            let (next, question) = issue_question(state, &bank, &mut rng);
            assert_eq!(next.last_category_index, round % n);
            assert_eq!(question.category, bank.categories()[(round % n) as usize]);
            state = next;
        }
    }

    #[test]
    fn test_gate_check_is_idempotent() {
        let bank = factorial_bank();
        let mut rng = StdRng::seed_from_u64(0);
        let (state, _) = issue_question(RiddleSessionState::default(), &bank, &mut rng);

        let before = state.clone();
        for _ in 0..10 {
            assert!(!state.is_unlocked());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_state_roundtrips_partial_json() {
        let state: RiddleSessionState = serde_json::from_str(r#"{"unlocked":true}"#).unwrap();
        assert!(state.unlocked);
        assert_eq!(state.last_category_index, -1);
        assert_eq!(state.expected_answer, None);
    }
}
