//! Local verification helper that reveals the current expected answer.
//!
//! Disabled unless `debug_show_answer` is set (`DEBUG_SHOW_ANSWER=1`).

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sphinx_common::constants::error_codes;

use crate::session_token::VisitorSession;
use crate::state::AppState;

pub async fn debug_answer(
    State(state): State<AppState>,
    VisitorSession(session): VisitorSession,
) -> Response {
    if !state.config.debug_show_answer {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "ok": false, "error": error_codes::DISABLED })),
        )
            .into_response();
    }

    tracing::warn!("Debug endpoint revealed a riddle answer");
    Json(json!({ "ok": true, "answer": session.expected_answer })).into_response()
}
