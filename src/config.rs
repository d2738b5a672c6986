//! Application configuration loaded from environment variables.
//!
//! Credentials for LinkedIn and the AI provider are optional at startup.
//! A missing credential only fails the requests that need it, with a
//! configuration error raised before any outbound call.

use crate::models::Persona;
use ring::rand::{SecureRandom, SystemRandom};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_AI_PROVIDER_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "deepseek-chat";
pub const DEFAULT_LINKEDIN_OAUTH_URL: &str = "https://www.linkedin.com/oauth/v2";
pub const DEFAULT_LINKEDIN_API_URL: &str = "https://api.linkedin.com";
pub const DEFAULT_OAUTH_SCOPES: &str = "openid profile w_member_social";

/// Length of the generated HMAC key when `OAUTH_STATE_KEY` is unset.
const GENERATED_STATE_KEY_LEN: usize = 32;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,

    // --- LinkedIn OAuth ---
    pub oauth_client_id: Option<String>,
    pub oauth_client_secret: Option<String>,
    /// Redirect URI registered with the LinkedIn app
    pub oauth_redirect_uri: Option<String>,
    pub oauth_scopes: Vec<String>,
    /// HMAC key for signing the OAuth `state` parameter (raw bytes)
    pub oauth_state_key: Vec<u8>,
    pub linkedin_oauth_url: String,
    pub linkedin_api_url: String,

    // --- AI provider ---
    pub ai_provider_api_key: Option<String>,
    pub ai_provider_url: String,
    pub ai_model: String,
    pub persona: Persona,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8000,
            frontend_url: "http://localhost:8501".to_string(),
            oauth_client_id: Some("test_client_id".to_string()),
            oauth_client_secret: Some("test_client_secret".to_string()),
            oauth_redirect_uri: Some("http://localhost:8000/api/auth/callback".to_string()),
            oauth_scopes: parse_scopes(DEFAULT_OAUTH_SCOPES),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            linkedin_oauth_url: DEFAULT_LINKEDIN_OAUTH_URL.to_string(),
            linkedin_api_url: DEFAULT_LINKEDIN_API_URL.to_string(),
            ai_provider_api_key: Some("test_ai_key".to_string()),
            ai_provider_url: DEFAULT_AI_PROVIDER_URL.to_string(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            persona: Persona::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated as unset
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        // Current name first, then the legacy name from the old deployment
        let get_either = |key: &str, legacy: &str| get(key).or_else(|| get(legacy));

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw.clone()))?,
            None => 8000,
        };

        let oauth_state_key = match get("OAUTH_STATE_KEY") {
            Some(key) => key.into_bytes(),
            None => {
                tracing::warn!(
                    "OAUTH_STATE_KEY not set, generating a per-process key; \
                     pending logins will not survive a restart"
                );
                generate_state_key()?
            }
        };

        let persona = match get("PERSONA_FILE") {
            Some(path) => Persona::load(PathBuf::from(path))?,
            None => Persona::default(),
        };

        Ok(Self {
            port,
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:8501".to_string()),
            oauth_client_id: get_either("OAUTH_CLIENT_ID", "LINKEDIN_CLIENT_ID"),
            oauth_client_secret: get_either("OAUTH_CLIENT_SECRET", "LINKEDIN_CLIENT_SECRET"),
            oauth_redirect_uri: get_either("OAUTH_REDIRECT_URI", "LINKEDIN_REDIRECT_URI"),
            oauth_scopes: parse_scopes(
                &get("OAUTH_SCOPES").unwrap_or_else(|| DEFAULT_OAUTH_SCOPES.to_string()),
            ),
            oauth_state_key,
            linkedin_oauth_url: trim_base(
                get("LINKEDIN_OAUTH_URL")
                    .unwrap_or_else(|| DEFAULT_LINKEDIN_OAUTH_URL.to_string()),
            ),
            linkedin_api_url: trim_base(
                get("LINKEDIN_API_URL").unwrap_or_else(|| DEFAULT_LINKEDIN_API_URL.to_string()),
            ),
            ai_provider_api_key: get_either("AI_PROVIDER_API_KEY", "DEEPSEEK_API_KEY"),
            ai_provider_url: get("AI_PROVIDER_URL")
                .unwrap_or_else(|| DEFAULT_AI_PROVIDER_URL.to_string()),
            ai_model: get("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            persona,
        })
    }

    /// Log which optional credentials are present, without their values.
    pub fn log_summary(&self) {
        tracing::info!(
            port = self.port,
            frontend_url = %self.frontend_url,
            oauth_client_id = self.oauth_client_id.is_some(),
            oauth_client_secret = self.oauth_client_secret.is_some(),
            oauth_redirect_uri = ?self.oauth_redirect_uri,
            ai_provider_api_key = self.ai_provider_api_key.is_some(),
            ai_provider_url = %self.ai_provider_url,
            ai_model = %self.ai_model,
            "Configuration loaded"
        );
    }
}

/// Scopes may be separated by spaces or commas.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn generate_state_key() -> Result<Vec<u8>, ConfigError> {
    let mut key = vec![0u8; GENERATED_STATE_KEY_LEN];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| ConfigError::Random)?;
    Ok(key)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),

    #[error("Failed to read persona file {path}: {reason}")]
    Persona { path: String, reason: String },

    #[error("System random number generator unavailable")]
    Random,
}
