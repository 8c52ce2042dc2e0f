//! Error responses for the HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors a handler can hand back to the client.
///
/// Provider failures never reach here. The annotator turns them into a
/// fallback segment and the request still succeeds.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("No text provided")]
    MissingText,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingText => StatusCode::BAD_REQUEST,
        };
        tracing::debug!(status = %status, error = %self, "rejecting request");

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
