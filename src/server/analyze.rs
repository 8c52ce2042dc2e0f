//! `POST /analyze`

use axum::{Json, body::Bytes, extract::State};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::AppState;
use super::error::AppError;
use crate::annotation::{AnnotationRequest, DEFAULT_CREATIVITY, DEFAULT_STYLE};
use crate::annotator::AnnotationResult;

/// Annotate the posted manuscript.
///
/// Answers 400 only when there is no usable `text`. Every other outcome,
/// including a failed provider call, is a 200 with a segment array.
pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnnotationResult>, AppError> {
    let request = parse_request(&body)?;
    info!(
        chars = request.text.chars().count(),
        creativity = %request.creativity_level,
        style = %request.narrator_style,
        has_context = request.book_context().is_some(),
        "analyze request"
    );

    let segments = state.annotator().annotate(&request).await;
    Ok(Json(segments))
}

/// Decode the body and apply defaults for the optional fields.
///
/// Optional fields that are missing, null, or not strings take their
/// defaults. `text` must be a string.
pub fn parse_request(body: &[u8]) -> Result<AnnotationRequest, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "request body is not JSON");
        AppError::MissingText
    })?;
    let Value::Object(fields) = value else {
        return Err(AppError::MissingText);
    };

    let text = string_field(&fields, "text").ok_or(AppError::MissingText)?;

    Ok(AnnotationRequest::new(text)
        .with_creativity(string_field(&fields, "creativity_level").unwrap_or(DEFAULT_CREATIVITY))
        .with_style(string_field(&fields, "narrator_style").unwrap_or(DEFAULT_STYLE))
        .with_book_description(string_field(&fields, "book_description").unwrap_or_default()))
}

fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}
