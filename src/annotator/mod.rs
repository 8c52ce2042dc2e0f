//! Turns an [`AnnotationRequest`] into annotated segments.
//!
//! The annotator renders the prompt, hands it to a [`Generator`], and
//! normalizes whatever comes back. It never fails: any provider or decode
//! error collapses into a single fallback segment.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::annotation::{AnnotationRequest, AnnotationSegment};
use crate::generator::{GenerationOptions, Generator};
use crate::prompts::build_narration_prompt;

/// Segments in the order the model produced them. Elements are passed
/// through untouched so callers see exactly what the model returned.
pub type AnnotationResult = Vec<Value>;

pub struct Annotator {
    generator: Arc<dyn Generator>,
    options: GenerationOptions,
}

impl Annotator {
    pub fn new(generator: Arc<dyn Generator>, options: GenerationOptions) -> Self {
        Self { generator, options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Annotate a manuscript. Always returns at least one segment.
    pub async fn annotate(&self, request: &AnnotationRequest) -> AnnotationResult {
        let prompt = build_narration_prompt(request);

        match self.try_annotate(&prompt).await {
            Ok(segments) => {
                info!(
                    segments = segments.len(),
                    chars = request.text.chars().count(),
                    "annotation complete"
                );
                check_segments(&request.text, &segments);
                segments
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "gemini call or JSON parsing failed");
                fallback_segments(&e)
            }
        }
    }

    async fn try_annotate(&self, prompt: &str) -> Result<AnnotationResult> {
        let raw = self
            .generator
            .generate(prompt, &self.options)
            .await
            .context("generation failed")?;
        parse_segments(&raw)
    }
}

/// Decode the model's reply. Anything but a top-level JSON array is an error.
pub fn parse_segments(raw: &str) -> Result<AnnotationResult> {
    let value: Value =
        serde_json::from_str(extract_json(raw)).context("model response is not valid JSON")?;

    match value {
        Value::Array(items) => Ok(items),
        other => bail!(
            "model response is not a JSON array (got {})",
            json_kind(&other)
        ),
    }
}

/// The one-element array returned in place of a real analysis.
pub fn fallback_segments(err: &anyhow::Error) -> AnnotationResult {
    let segment = AnnotationSegment::fallback(format!("{err:#}"));
    vec![serde_json::to_value(segment).unwrap_or(Value::Null)]
}

/// Log, but do not reject, replies that break the segment contract.
fn check_segments(manuscript: &str, segments: &[Value]) {
    let malformed = segments
        .iter()
        .filter(|s| serde_json::from_value::<AnnotationSegment>((*s).clone()).is_err())
        .count();
    if malformed > 0 {
        warn!(malformed, "segments do not match the annotation shape");
    }

    let joined: String = segments
        .iter()
        .filter_map(|s| s.get("text").and_then(Value::as_str))
        .collect();
    if joined != manuscript {
        warn!(
            expected_chars = manuscript.chars().count(),
            actual_chars = joined.chars().count(),
            "segment texts do not reproduce the manuscript"
        );
    }
}

/// Extract JSON from text that may be wrapped in markdown code fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(after) = trimmed.strip_prefix("```json")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }
    if let Some(after) = trimmed.strip_prefix("```")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }

    trimmed
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
