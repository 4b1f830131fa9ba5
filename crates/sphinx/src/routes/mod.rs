//! HTTP route handlers for Sphinx.

use axum::{
    Router,
    extract::State,
    middleware,
    response::Html,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::gate;
use crate::state::AppState;

mod debug;
mod feedback;
mod fields;
mod health;
mod riddle;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // Protected entry point, behind the riddle gate
    let gated = Router::new()
        .route("/", get(index))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::riddle_gate));

    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))

        // Riddle flow
        .route("/riddle", get(riddle::get_riddle))
        .route("/solve", post(riddle::solve))

        // Feedback (never gated)
        .route("/api/feedback", post(feedback::submit_feedback))
        .route("/api/feedbacks", get(feedback::list_feedbacks))
        .route("/api/feedbacks.csv", get(feedback::export_csv))

        // Local verification tooling
        .route("/_debug_answer", get(debug::debug_answer))

        .merge(gated)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Main site page, reached only through the gate
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.index.clone())
}
