//! Gate middleware for the protected entry point.
//!
//! Unlocked visitors reach the wrapped handler; everyone else gets the
//! riddle page. Both paths answer 200 and nothing is mutated.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::session_token::VisitorSession;
use crate::state::AppState;

pub async fn riddle_gate(
    State(state): State<AppState>,
    VisitorSession(session): VisitorSession,
    request: Request,
    next: Next,
) -> Response {
    if session.is_unlocked() {
        next.run(request).await
    } else {
        tracing::debug!(
            path = %request.uri().path(),
            phase = ?session.phase(),
            "Gate locked, serving riddle page"
        );
        Html(state.pages.riddle.clone()).into_response()
    }
}
