//! Service configuration loaded from the environment.
//!
//! [`load_dotenv`] pulls a `.env` file into the process environment first,
//! so either source works. The credential is mandatory: without it neither
//! binary starts.

use thiserror::Error;

use crate::consts::{
    DEFAULT_API_BASE, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT, LISTER_KEY_VAR, SERVICE_KEY_VAR,
};

pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
pub const HOST_VAR: &str = "NARRATOR_HOST";
pub const PORT_VAR: &str = "NARRATOR_PORT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not found. Please set it in your environment or .env file.")]
    MissingApiKey(&'static str),

    #[error("invalid {var}: {value:?} is not a port number")]
    InvalidPort { var: &'static str, value: String },
}

/// Everything the annotator service needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub host: String,
    pub port: u16,
}

impl ServiceConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(SERVICE_KEY_VAR).ok_or(ConfigError::MissingApiKey(SERVICE_KEY_VAR))?;
        let port = match get(PORT_VAR) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    var: PORT_VAR,
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            host: get(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// `host:port` as handed to the listener, which resolves host names.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credential for the model lister: `GOOGLE_API_KEY`, else `GEMINI_API_KEY`.
pub fn lister_api_key(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    [LISTER_KEY_VAR, SERVICE_KEY_VAR]
        .into_iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .ok_or(ConfigError::MissingApiKey(LISTER_KEY_VAR))
}

/// Load `.env` from the working directory if one exists.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}
