use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_API_BASE, DEFAULT_MODEL};

use super::{GenerationOptions, Generator, SafetySetting};

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";
const LIST_PAGE_SIZE: &str = "1000";

/// A generator that calls the Gemini `generateContent` REST endpoint.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url,
            model_id(&self.model),
            GENERATE_METHOD
        )
    }

    fn build_request<'a>(prompt: &'a str, options: &'a GenerationOptions) -> ApiRequest<'a> {
        ApiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                response_mime_type: &options.response_mime_type,
            },
            safety_settings: &options.safety_settings,
        }
    }

    /// Pull the text out of the first candidate, or explain why there is none.
    fn extract_text(response: ApiResponse) -> Result<String> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                bail!("Gemini blocked the prompt: {}", reason);
            }
            bail!("Gemini returned no candidates");
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.is_empty() {
            bail!(
                "Gemini returned empty response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            );
        }

        Ok(text)
    }

    /// Fetch every model visible to this API key, following pagination.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let endpoint = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![("pageSize", LIST_PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }
            let url = reqwest::Url::parse_with_params(&endpoint, &params)
                .with_context(|| format!("invalid API base URL: {}", self.base_url))?;

            let resp = self
                .client
                .get(url)
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .context("failed to reach Gemini API")?;

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                bail!("Gemini API error ({}): {}", status, text);
            }

            let page: ListModelsResponse = resp
                .json()
                .await
                .context("failed to decode model list")?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let body = Self::build_request(prompt, options);

        let resp = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to reach Gemini API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Gemini API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .context("failed to decode Gemini response")?;

        if let Some(usage) = &api_resp.usage_metadata {
            debug!(
                model = %self.model,
                input_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "gemini usage"
            );
        }

        Self::extract_text(api_resp)
    }
}

/// Accept both `gemini-pro` and `models/gemini-pro`.
fn model_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

/// Metadata for one model as reported by the `models` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_token_limit: u64,
    #[serde(default)]
    pub output_token_limit: u64,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// True if the model can serve `generateContent` calls.
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_METHOD)
    }
}

// --- API types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    response_mime_type: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ApiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_body_shape() {
        let options = GenerationOptions::default();
        let body = GeminiGenerator::build_request("annotate this", &options);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "annotate this");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(json["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn generate_url_includes_model_and_method() {
        let generator = GeminiGenerator::new("key", Some("gemini-2.5-pro".to_string()))
            .with_base_url("http://localhost:9999/v1beta/");
        assert_eq!(
            generator.generate_url(),
            "http://localhost:9999/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn default_model_used_when_none_given() {
        let generator = GeminiGenerator::new("key", None);
        assert_eq!(generator.model(), DEFAULT_MODEL);
    }

    #[test]
    fn model_id_strips_prefix() {
        assert_eq!(model_id("models/gemini-pro"), "gemini-pro");
        assert_eq!(model_id("gemini-pro"), "gemini-pro");
    }

    #[test]
    fn extract_text_joins_parts() {
        let resp = parse(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "[{\"a\""}, {"text": ": 1}]"}]}, "finishReason": "STOP"}]}"#,
        );
        assert_eq!(GeminiGenerator::extract_text(resp).unwrap(), r#"[{"a": 1}]"#);
    }

    #[test]
    fn extract_text_uses_first_candidate() {
        let resp = parse(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]}"#,
        );
        assert_eq!(GeminiGenerator::extract_text(resp).unwrap(), "first");
    }

    #[test]
    fn extract_text_reports_block_reason() {
        let resp = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        let err = GeminiGenerator::extract_text(resp).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn extract_text_no_candidates_fails() {
        let err = GeminiGenerator::extract_text(parse("{}")).unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[test]
    fn extract_text_empty_reports_finish_reason() {
        let resp = parse(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#);
        let err = GeminiGenerator::extract_text(resp).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn model_info_deserializes() {
        let info: ModelInfo = serde_json::from_str(
            r#"{
                "name": "models/gemini-pro-latest",
                "displayName": "Gemini Pro Latest",
                "description": "Latest Pro release",
                "inputTokenLimit": 1048576,
                "outputTokenLimit": 65536,
                "supportedGenerationMethods": ["generateContent", "countTokens"]
            }"#,
        )
        .unwrap();
        assert_eq!(info.name, "models/gemini-pro-latest");
        assert_eq!(info.input_token_limit, 1_048_576);
        assert!(info.supports_generation());
    }

    #[test]
    fn embedding_model_does_not_support_generation() {
        let info: ModelInfo = serde_json::from_str(
            r#"{"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}"#,
        )
        .unwrap();
        assert!(!info.supports_generation());
        assert!(info.description.is_empty());
    }
}
