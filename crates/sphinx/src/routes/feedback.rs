//! Feedback submission, listing, and CSV export endpoints.

use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sphinx_common::constants::{export, listing};
use sphinx_common::{FeedbackRecord, NewFeedback, PageRequest};

use super::fields::SubmittedFields;
use crate::error::ApiError;
use crate::feedback::ExportScope;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SubmitResponse {
    ok: bool,
    id: i64,
}

/// Store a feedback submission
pub async fn submit_feedback(
    State(state): State<AppState>,
    fields: SubmittedFields,
) -> Result<Json<SubmitResponse>, ApiError> {
    let payload = NewFeedback {
        name: fields.text("name"),
        email: fields.text("email"),
        message: fields.text("message").unwrap_or_default(),
    };
    let record = state.store.insert(payload).await?;
    Ok(Json(SubmitResponse {
        ok: true,
        id: record.id,
    }))
}

/// Raw paging parameters; parsed leniently
#[derive(Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

#[derive(Serialize)]
pub struct ListResponse {
    ok: bool,
    total: u64,
    page: u32,
    #[serde(rename = "pageSize")]
    page_size: u32,
    feedbacks: Vec<FeedbackRecord>,
}

/// Newest-first page of feedback
pub async fn list_feedbacks(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let request = PageRequest::from_params(
        params.page.as_deref(),
        params.page_size.as_deref(),
        listing::DEFAULT_PAGE_SIZE,
        listing::MAX_PAGE_SIZE,
    );
    let page = state.queries.list(request).await?;

    Ok(Json(ListResponse {
        ok: true,
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        feedbacks: page.records,
    }))
}

#[derive(Deserialize)]
pub struct ExportQuery {
    all: Option<String>,
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

/// Stream feedback as a CSV attachment
pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Response {
    let scope = ExportScope::from_params(
        params.all.as_deref(),
        params.page.as_deref(),
        params.page_size.as_deref(),
    );
    tracing::debug!(scope = ?scope, "Starting CSV export");

    let body = Body::from_stream(state.exporter.stream(scope));

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::FILE_NAME),
            ),
        ],
        body,
    )
        .into_response()
}
