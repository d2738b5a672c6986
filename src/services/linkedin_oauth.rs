// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn OAuth 2.0 authorization-code flow.
//!
//! Handles:
//! - Building the authorization redirect URL
//! - Exchanging an authorization code for an access token
//!
//! A single exchange attempt is made; failures go back to the caller.

use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::models::{OAuthToken, PendingExchange};
use reqwest::StatusCode;
use serde::Deserialize;

/// LinkedIn OAuth client.
#[derive(Clone)]
pub struct LinkedInOAuth {
    http: reqwest::Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    scopes: Vec<String>,
}

impl LinkedInOAuth {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.linkedin_oauth_url.clone(),
            client_id: config.oauth_client_id.clone(),
            client_secret: config.oauth_client_secret.clone(),
            redirect_uri: config.oauth_redirect_uri.clone(),
            scopes: config.oauth_scopes.clone(),
        }
    }

    /// Redirect URI registered with the LinkedIn app.
    pub fn redirect_uri(&self) -> Result<&str, ConfigError> {
        self.redirect_uri
            .as_deref()
            .ok_or(ConfigError::Missing("OAUTH_REDIRECT_URI"))
    }

    fn client_id(&self) -> Result<&str, ConfigError> {
        self.client_id
            .as_deref()
            .ok_or(ConfigError::Missing("OAUTH_CLIENT_ID"))
    }

    fn client_secret(&self) -> Result<&str, ConfigError> {
        self.client_secret
            .as_deref()
            .ok_or(ConfigError::Missing("OAUTH_CLIENT_SECRET"))
    }

    /// Build the LinkedIn authorization URL the user is redirected to.
    pub fn authorization_url(&self, state: &str) -> Result<String, AppError> {
        let client_id = self.client_id()?;
        let redirect_uri = self.redirect_uri()?;

        Ok(format!(
            "{}/authorization?\
             response_type=code&\
             client_id={}&\
             redirect_uri={}&\
             scope={}&\
             state={}",
            self.base_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&self.scopes.join(" ")),
            urlencoding::encode(state),
        ))
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, pending: &PendingExchange) -> Result<OAuthToken, AppError> {
        let client_id = self.client_id()?;
        let client_secret = self.client_secret()?;
        let redirect_uri = self.redirect_uri()?;

        if pending.redirect_uri() != redirect_uri {
            return Err(AppError::BadRequest(
                "Redirect URI does not match the registered value".to_string(),
            ));
        }

        tracing::info!("Exchanging LinkedIn authorization code for access token");

        let response = self
            .http
            .post(format!("{}/accessToken", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", pending.code()),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::network(AppError::LINKEDIN, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "LinkedIn token exchange failed");
            return Err(classify_exchange_error(status, &body));
        }

        let grant: TokenResponse = response.json().await.map_err(|e| {
            AppError::provider(
                AppError::LINKEDIN,
                format!("Failed to parse token response: {}", e),
            )
        })?;

        let token = OAuthToken::from_grant(
            grant.access_token,
            grant.expires_in,
            grant.scope.as_deref(),
            chrono::Utc::now(),
        );

        tracing::info!(
            expires_at = %token.expires_at,
            scopes = ?token.scopes,
            "LinkedIn access token obtained"
        );

        Ok(token)
    }
}

/// Map a failed token endpoint response onto the error taxonomy.
fn classify_exchange_error(status: StatusCode, body: &str) -> AppError {
    let parsed: Option<TokenErrorResponse> = serde_json::from_str(body).ok();
    let reason = parsed
        .as_ref()
        .map(|e| e.error_description.clone().unwrap_or_else(|| e.error.clone()))
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited {
            provider: AppError::LINKEDIN,
        },
        // Bad client credentials are our misconfiguration, not a bad code
        _ if parsed.as_ref().is_some_and(|e| e.error == "invalid_client") => {
            AppError::provider(AppError::LINKEDIN, reason)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => AppError::InvalidCode(reason),
        _ => AppError::provider(
            AppError::LINKEDIN,
            format!("Token exchange failed with status {}", status),
        ),
    }
}

/// Token endpoint success response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    scope: Option<String>,
}

/// Token endpoint error response (RFC 6749 §5.2).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth(config: &Config) -> LinkedInOAuth {
        LinkedInOAuth::new(reqwest::Client::new(), config)
    }

    #[test]
    fn test_authorization_url() {
        let config = Config::default();
        let url = oauth(&config).authorization_url("abc123").unwrap();

        assert!(url.starts_with("https://www.linkedin.com/oauth/v2/authorization?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fapi%2Fauth%2Fcallback"
        ));
        assert!(url.contains("scope=openid%20profile%20w_member_social"));
        assert!(url.contains("state=abc123"));
    }

    #[test]
    fn test_authorization_url_requires_client_id() {
        let config = Config {
            oauth_client_id: None,
            ..Config::default()
        };
        let err = oauth(&config).authorization_url("abc").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::Missing("OAUTH_CLIENT_ID"))
        ));
    }

    #[test]
    fn test_classify_invalid_code() {
        let body = r#"{"error":"invalid_request","error_description":"authorization code expired"}"#;
        let err = classify_exchange_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, AppError::InvalidCode(ref msg) if msg == "authorization code expired"));
    }

    #[test]
    fn test_classify_invalid_client() {
        let body = r#"{"error":"invalid_client","error_description":"Client authentication failed"}"#;
        let err = classify_exchange_error(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, AppError::Provider { .. }));
    }

    #[test]
    fn test_classify_server_error() {
        let err = classify_exchange_error(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert!(matches!(err, AppError::Provider { .. }));

        let err = classify_exchange_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, AppError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_exchange_rejects_mismatched_redirect() {
        let config = Config::default();
        let pending = PendingExchange::new("code", "https://evil.example.com/cb").unwrap();

        let err = oauth(&config).exchange_code(&pending).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_exchange_requires_secret() {
        let config = Config {
            oauth_client_secret: None,
            ..Config::default()
        };
        let pending =
            PendingExchange::new("code", config.oauth_redirect_uri.clone().unwrap()).unwrap();

        let err = oauth(&config).exchange_code(&pending).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::Missing("OAUTH_CLIENT_SECRET"))
        ));
    }
}
