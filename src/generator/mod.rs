pub mod gemini;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::consts::{DEFAULT_TEMPERATURE, JSON_MIME_TYPE};

/// Harm categories the provider filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HateSpeech,
        HarmCategory::Harassment,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

/// How aggressively a category is blocked. `BlockNone` is the most permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Everything the remote call needs besides the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub response_mime_type: String,
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for GenerationOptions {
    /// JSON output at temperature 0.7 with every harm filter disabled.
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            response_mime_type: JSON_MIME_TYPE.to_string(),
            safety_settings: HarmCategory::ALL
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: HarmBlockThreshold::BlockNone,
                })
                .collect(),
        }
    }
}

/// The remote text generator. Could be Gemini or a test script.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_disable_all_filters() {
        let options = GenerationOptions::default();
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.response_mime_type, "application/json");
        assert_eq!(options.safety_settings.len(), 4);
        assert!(
            options
                .safety_settings
                .iter()
                .all(|s| s.threshold == HarmBlockThreshold::BlockNone)
        );
    }

    #[test]
    fn default_options_cover_each_category_once() {
        let options = GenerationOptions::default();
        for category in HarmCategory::ALL {
            let count = options
                .safety_settings
                .iter()
                .filter(|s| s.category == category)
                .count();
            assert_eq!(count, 1, "{category:?}");
        }
    }

    #[test]
    fn safety_setting_wire_names() {
        let setting = SafetySetting {
            category: HarmCategory::SexuallyExplicit,
            threshold: HarmBlockThreshold::BlockNone,
        };
        let json = serde_json::to_value(setting).unwrap();
        assert_eq!(json["category"], "HARM_CATEGORY_SEXUALLY_EXPLICIT");
        assert_eq!(json["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn threshold_wire_names() {
        let json = serde_json::to_value(HarmBlockThreshold::BlockMediumAndAbove).unwrap();
        assert_eq!(json, "BLOCK_MEDIUM_AND_ABOVE");
    }
}
