//! Core types shared across Sphinx components.

use std::num::IntErrorKind;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SphinxError;

/// Normalize a riddle answer or guess for comparison.
///
/// Only surrounding whitespace is trimmed and ASCII/Unicode case folded to
/// lowercase. "5040" and "5,040" stay distinct.
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A single trivia entry in the riddle bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiddleEntry {
    /// Category name, one of the bank's rotation
    pub category: String,
    /// Question shown to the visitor
    pub question: String,
    /// Expected answer (never sent to the client)
    #[serde(skip_serializing)]
    pub answer: String,
}

impl RiddleEntry {
    pub fn new(category: &str, question: &str, answer: &str) -> Self {
        Self {
            category: category.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}

/// Question payload returned by `GET /riddle`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedQuestion {
    pub question: String,
    pub category: String,
}

/// Result of an answer submission, returned by `POST /solve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveOutcome {
    pub fn solved() -> Self {
        Self { ok: true, error: None }
    }

    pub fn mismatch() -> Self {
        Self { ok: false, error: None }
    }

    /// No riddle was ever issued to this session
    pub fn no_riddle() -> Self {
        Self {
            ok: false,
            error: Some(SphinxError::NoActiveChallenge.code().to_string()),
        }
    }
}

/// A persisted feedback submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Store-assigned, strictly increasing id
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    /// Server clock at insert time
    pub created_at: DateTime<Utc>,
}

/// Feedback as submitted, before the store assigns id and timestamp
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl NewFeedback {
    pub fn new(name: Option<&str>, email: Option<&str>, message: &str) -> Self {
        Self {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            message: message.to_string(),
        }
    }

    /// Trim all fields, drop blank name/email, and reject a blank message.
    pub fn validate(self) -> Result<Self, SphinxError> {
        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Err(SphinxError::empty_message());
        }

        Ok(Self {
            name: non_blank(self.name),
            email: non_blank(self.email),
            message,
        })
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A clamped page window over the feedback table.
///
/// `page` is 1-based and never below 1; `page_size` always lies in
/// `[1, max_page_size]` for whichever bound built it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl PageRequest {
    /// Clamp numeric inputs into range
    pub fn clamped(page: i64, page_size: i64, max_page_size: u32) -> Self {
        let page = page.clamp(1, u32::MAX as i64) as u32;
        let page_size = page_size.clamp(1, max_page_size.max(1) as i64) as u32;
        Self { page, page_size }
    }

    /// Build from raw query-string values.
    ///
    /// Missing or non-numeric values fall back to the defaults; numeric
    /// values are clamped.
    pub fn from_params(
        page: Option<&str>,
        page_size: Option<&str>,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Self {
        let page = parse_or(page, crate::constants::listing::DEFAULT_PAGE as i64);
        let page_size = parse_or(page_size, default_page_size as i64);
        Self::clamped(page, page_size, max_page_size)
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

/// Integers past the i64 range saturate so they still clamp to the bound
fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => default,
        },
    }
}

/// One page of the reverse-chronological feedback listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPage {
    /// Total rows in the table, independent of the window
    pub total: u64,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub records: Vec<FeedbackRecord>,
}
