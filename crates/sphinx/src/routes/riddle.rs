//! Riddle issuance and answer endpoints.

use axum::{
    Json,
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse, Response},
};

use super::fields::SubmittedFields;
use crate::error::ApiError;
use crate::riddle::{issue_question, submit_answer};
use crate::session_token::VisitorSession;
use crate::state::AppState;

/// Issue the next question in this visitor's rotation
pub async fn get_riddle(
    State(state): State<AppState>,
    VisitorSession(session): VisitorSession,
) -> Result<Response, ApiError> {
    let (session, question) = issue_question(session, &state.bank, &mut rand::rng());
    let cookie = state.signer.set_cookie(&session)?;

    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(question)).into_response())
}

/// Check an answer against the last issued question
pub async fn solve(
    State(state): State<AppState>,
    VisitorSession(session): VisitorSession,
    fields: SubmittedFields,
) -> Result<Response, ApiError> {
    let answer = fields.text("answer").unwrap_or_default();
    let was_unlocked = session.is_unlocked();
    let (session, outcome) = submit_answer(session, &answer);

    // Only a fresh unlock changes the token
    if session.is_unlocked() && !was_unlocked {
        let cookie = state.signer.set_cookie(&session)?;
        return Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(outcome)).into_response());
    }

    Ok(Json(outcome).into_response())
}
