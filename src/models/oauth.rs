// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OAuth models: the authorization-code flow state and the resulting token.

use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Decoded contents of a verified OAuth `state` parameter.
///
/// Issued when the user is sent to LinkedIn and checked when LinkedIn
/// redirects back. Nothing is stored server-side; the signature is the
/// only proof the state came from us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationState {
    /// Redirect URI the authorization request was made with
    pub redirect_uri: String,
    pub issued_at: DateTime<Utc>,
    /// Random hex nonce so two states never collide
    pub nonce: String,
}

/// An authorization code waiting to be exchanged for a token.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    code: String,
    redirect_uri: String,
}

impl PendingExchange {
    pub fn new(code: &str, redirect_uri: impl Into<String>) -> Result<Self, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::BadRequest(
                "Authorization code must not be empty".to_string(),
            ));
        }

        Ok(Self {
            code: code.to_string(),
            redirect_uri: redirect_uri.into(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }
}

/// LinkedIn access token with its expiry and granted scopes.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub scopes: BTreeSet<String>,
}

impl OAuthToken {
    /// Build a token from a token endpoint response received at `now`.
    pub fn from_grant(
        access_token: String,
        expires_in_secs: i64,
        scope: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            expires_at: now + Duration::seconds(expires_in_secs.max(0)),
            scopes: scope
                .map(crate::config::parse_scopes)
                .unwrap_or_default()
                .into_iter()
                .collect(),
        }
    }

    /// Token presented by a client, with the expiry it kept if any.
    ///
    /// Without a known expiry LinkedIn itself decides whether the token
    /// is still valid.
    pub fn presented(access_token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token,
            expires_at: expires_at.unwrap_or(DateTime::<Utc>::MAX_UTC),
            scopes: BTreeSet::new(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Response of a successful OAuth callback.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AuthCallbackResponse {
    pub success: bool,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub scopes: Vec<String>,
}

impl From<OAuthToken> for AuthCallbackResponse {
    fn from(token: OAuthToken) -> Self {
        Self {
            success: true,
            access_token: token.access_token,
            expires_at: token.expires_at,
            scopes: token.scopes.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_exchange_rejects_empty_code() {
        let err = PendingExchange::new("   ", "http://localhost/cb").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let pending = PendingExchange::new(" abc ", "http://localhost/cb").unwrap();
        assert_eq!(pending.code(), "abc");
    }

    #[test]
    fn test_token_expiry() {
        let now = Utc::now();
        let token = OAuthToken::from_grant("t".to_string(), 60, None, now);

        assert!(!token.is_expired(now));
        assert!(!token.is_expired(now + Duration::seconds(59)));
        assert!(token.is_expired(now + Duration::seconds(60)));
    }

    #[test]
    fn test_presented_token_without_expiry_is_not_expired() {
        let token = OAuthToken::presented("t".to_string(), None);
        assert!(!token.is_expired(Utc::now()));

        let token = OAuthToken::presented("t".to_string(), Some(Utc::now() - Duration::hours(1)));
        assert!(token.is_expired(Utc::now()));
    }

    #[test]
    fn test_scope_parsing_accepts_commas_and_spaces() {
        let now = Utc::now();
        let legacy = OAuthToken::from_grant("t".into(), 10, Some("r_liteprofile,w_member_social"), now);
        let oidc = OAuthToken::from_grant("t".into(), 10, Some("openid profile w_member_social"), now);

        assert!(legacy.has_scope("w_member_social"));
        assert!(oidc.has_scope("w_member_social"));
        assert_eq!(oidc.scopes.len(), 3);
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let token = OAuthToken::from_grant("super-secret".into(), 10, None, Utc::now());
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
