//! Request and segment types for narration annotation.

use serde::{Deserialize, Serialize};

use crate::consts::FALLBACK_EMOJI;

pub const DEFAULT_CREATIVITY: &str = "balanced";
pub const DEFAULT_STYLE: &str = "neutral storyteller";

/// What the caller wants annotated, with defaults already applied.
///
/// `creativity_level` and `narrator_style` are kept as free-form strings:
/// values outside the known tables are passed into the prompt verbatim
/// without their instruction clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRequest {
    pub text: String,
    pub creativity_level: String,
    pub narrator_style: String,
    pub book_description: String,
}

impl AnnotationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            creativity_level: DEFAULT_CREATIVITY.to_string(),
            narrator_style: DEFAULT_STYLE.to_string(),
            book_description: String::new(),
        }
    }

    pub fn with_creativity(mut self, level: impl Into<String>) -> Self {
        self.creativity_level = level.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.narrator_style = style.into();
        self
    }

    pub fn with_book_description(mut self, description: impl Into<String>) -> Self {
        self.book_description = description.into();
        self
    }

    /// The book description if it carries anything besides whitespace.
    pub fn book_context(&self) -> Option<&str> {
        let trimmed = self.book_description.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Performance directive attached to a slice of manuscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentType {
    SpeedUp,
    SlowDown,
    Emphasize,
    RaisePitch,
    LowerPitch,
    Whisper,
    Pause,
    Normal,
}

impl SegmentType {
    pub const ALL: [SegmentType; 8] = [
        SegmentType::SpeedUp,
        SegmentType::SlowDown,
        SegmentType::Emphasize,
        SegmentType::RaisePitch,
        SegmentType::LowerPitch,
        SegmentType::Whisper,
        SegmentType::Pause,
        SegmentType::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::SpeedUp => "speed-up",
            SegmentType::SlowDown => "slow-down",
            SegmentType::Emphasize => "emphasize",
            SegmentType::RaisePitch => "raise-pitch",
            SegmentType::LowerPitch => "lower-pitch",
            SegmentType::Whisper => "whisper",
            SegmentType::Pause => "pause",
            SegmentType::Normal => "normal",
        }
    }
}

/// One annotated slice of the manuscript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSegment {
    pub text: String,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub feedback: String,
    pub emotion_emoji: String,
}

impl AnnotationSegment {
    /// The apology segment returned in place of a real analysis.
    pub fn fallback(error: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Sorry, an error occurred during AI analysis. Details: {error}"),
            segment_type: SegmentType::Normal,
            feedback: "There was a problem generating the performance script. \
                       Please try uploading the file again."
                .to_string(),
            emotion_emoji: FALLBACK_EMOJI.to_string(),
        }
    }
}
