//! Riddle gate: the trivia bank, the category rotation, and the
//! per-visitor state machine that decides whether the site is unlocked.
//!
//! The state machine is pure. Callers load a [`RiddleSessionState`] from
//! wherever it travels (here: a signed cookie), pass it through
//! [`issue_question`] or [`submit_answer`], and persist what comes back.

mod bank;
mod cycler;
mod session;

pub use bank::RiddleBank;
pub use cycler::CategoryCycler;
pub use session::{RiddleSessionState, issue_question, submit_answer};
