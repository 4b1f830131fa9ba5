//! HTTP mapping for [`SphinxError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sphinx_common::SphinxError;
use thiserror::Error;

/// Error returned by handlers, rendered as `{ok:false, error:<code>}`
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub SphinxError);

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self(SphinxError::Internal(format!("{e:#}")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        (status, Json(json!({ "ok": false, "error": self.0.code() }))).into_response()
    }
}
