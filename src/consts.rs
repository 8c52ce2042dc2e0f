//! Project-wide constants.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Default Gemini model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-pro-latest";

/// Base URL of the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Credential read by the annotator service.
pub const SERVICE_KEY_VAR: &str = "GEMINI_API_KEY";

/// Credential read by the model lister. Falls back to [`SERVICE_KEY_VAR`].
pub const LISTER_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Sampling temperature for annotation requests.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const JSON_MIME_TYPE: &str = "application/json";

/// Emoji carried by the single segment returned when analysis fails.
pub const FALLBACK_EMOJI: &str = "😕";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "narrator=info,list_models=info,tower_http=info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!VERSION.is_empty());
        assert!(!DEFAULT_MODEL.is_empty());
        assert!(!FALLBACK_EMOJI.is_empty());
    }

    #[test]
    fn consts_from_cargo_toml() {
        assert_eq!(SERVICE_NAME, "narrator");
    }

    #[test]
    fn api_base_has_no_trailing_slash() {
        assert!(!DEFAULT_API_BASE.ends_with('/'));
        assert!(DEFAULT_API_BASE.starts_with("https://"));
    }

    #[test]
    fn fallback_emoji_is_single_glyph() {
        assert_eq!(FALLBACK_EMOJI.chars().count(), 1);
    }
}
