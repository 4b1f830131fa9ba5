//! Common error types for Sphinx components.

use thiserror::Error;

use crate::constants::error_codes;

/// Errors shared across the riddle gate and the feedback store
#[derive(Debug, Error)]
pub enum SphinxError {
    /// Input rejected at the boundary (carries the error code)
    #[error("Validation failed: {0}")]
    Validation(&'static str),

    /// `/solve` called before any question was issued
    #[error("No active riddle for this session")]
    NoActiveChallenge,

    /// Underlying persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SphinxError {
    /// Shorthand for the empty feedback message rejection
    pub fn empty_message() -> Self {
        Self::Validation(error_codes::EMPTY_MESSAGE)
    }

    /// Request body that is neither a JSON object nor a urlencoded form
    pub fn invalid_body() -> Self {
        Self::Validation(error_codes::INVALID_BODY)
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            // Answering without a riddle is an expected outcome, not a failure
            Self::NoActiveChallenge => 200,
            Self::Storage(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Machine-readable code for JSON error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(code) => *code,
            Self::NoActiveChallenge => error_codes::NO_RIDDLE,
            Self::Storage(_) => error_codes::DB_ERROR,
            Self::Internal(_) => error_codes::INTERNAL,
        }
    }
}
