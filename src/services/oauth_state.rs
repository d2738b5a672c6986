// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed, short-lived OAuth `state` parameter.
//!
//! The state carries the redirect URI, issue time and a random nonce,
//! signed with HMAC-SHA256:
//!
//! `base64url("redirect_uri|issued_at_ms_hex|nonce_hex|signature_hex")`
//!
//! No server-side session is needed to check it on callback.

use crate::error::AppError;
use crate::models::AuthorizationState;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// How long a user has to finish the LinkedIn consent screen.
pub const STATE_TTL_SECS: i64 = 10 * 60;
/// Tolerated clock difference for states issued "in the future".
const CLOCK_SKEW_SECS: i64 = 60;
const NONCE_LEN: usize = 16;

/// Issues and verifies OAuth state parameters.
#[derive(Clone)]
pub struct OAuthStateSigner {
    key: Vec<u8>,
    ttl: Duration,
    rng: SystemRandom,
}

impl OAuthStateSigner {
    pub fn new(key: Vec<u8>) -> Self {
        Self {
            key,
            ttl: Duration::seconds(STATE_TTL_SECS),
            rng: SystemRandom::new(),
        }
    }

    /// Override the validity window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Create a signed state for an authorization request.
    pub fn issue(&self, redirect_uri: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate state nonce")))?;

        // Create the data payload: "redirect_uri|timestamp_hex|nonce_hex"
        let payload = format!(
            "{}|{:x}|{}",
            redirect_uri,
            now.timestamp_millis(),
            hex::encode(nonce)
        );

        let signature = self.sign(&payload)?;

        Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
    }

    /// Verify signature and age, returning the decoded state.
    pub fn verify(&self, state: &str, now: DateTime<Utc>) -> Option<AuthorizationState> {
        let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
        let state_str = String::from_utf8(bytes).ok()?;

        // Split from the right: only the redirect URI may contain '|'
        let parts: Vec<&str> = state_str.rsplitn(4, '|').collect();
        if parts.len() != 4 {
            return None;
        }
        let (signature_hex, nonce, timestamp_hex, redirect_uri) =
            (parts[0], parts[1], parts[2], parts[3]);

        let payload = format!("{}|{}|{}", redirect_uri, timestamp_hex, nonce);
        let signature = hex::decode(signature_hex).ok()?;

        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(payload.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            tracing::error!("OAuth state signature mismatch! Potential tampering.");
            return None;
        }

        let issued_at =
            DateTime::from_timestamp_millis(i64::from_str_radix(timestamp_hex, 16).ok()?)?;

        if now - issued_at > self.ttl {
            tracing::warn!(issued_at = %issued_at, "OAuth state expired");
            return None;
        }
        if issued_at - now > Duration::seconds(CLOCK_SKEW_SECS) {
            tracing::warn!(issued_at = %issued_at, "OAuth state issued in the future");
            return None;
        }

        Some(AuthorizationState {
            redirect_uri: redirect_uri.to_string(),
            issued_at,
            nonce: nonce.to_string(),
        })
    }

    fn sign(&self, payload: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}
