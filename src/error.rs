// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::config::ConfigError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid authorization code: {0}")]
    InvalidCode(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("LinkedIn access token expired, please re-authenticate")]
    ExpiredToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Malformed payload rejected by {provider}: {message}")]
    MalformedPayload {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limited by {provider}")]
    RateLimited { provider: &'static str },

    #[error("{provider} API error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("Network error talking to {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    Provider,
    Network,
    Configuration,
    Internal,
}

impl AppError {
    pub const LINKEDIN: &'static str = "LinkedIn";
    pub const AI_PROVIDER: &'static str = "AI provider";

    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        AppError::Provider {
            provider,
            message: message.into(),
        }
    }

    /// Transport-level failure from reqwest (connect, TLS, body read).
    pub fn network(provider: &'static str, err: reqwest::Error) -> Self {
        AppError::Network {
            provider,
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_) => ErrorKind::Validation,
            AppError::InvalidCode(_)
            | AppError::Unauthorized(_)
            | AppError::ExpiredToken
            | AppError::Forbidden(_) => ErrorKind::Auth,
            AppError::MalformedPayload { .. }
            | AppError::RateLimited { .. }
            | AppError::Provider { .. } => ErrorKind::Provider,
            AppError::Network { .. } => ErrorKind::Network,
            AppError::Config(_) => ErrorKind::Configuration,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True if the user has to go through the LinkedIn login again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AppError::ExpiredToken | AppError::InvalidCode(_) | AppError::Unauthorized(_)
        )
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::InvalidCode(_) => (StatusCode::UNAUTHORIZED, "invalid_code"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "auth_error"),
            AppError::ExpiredToken => (StatusCode::UNAUTHORIZED, "expired_token"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::MalformedPayload { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "malformed_payload")
            }
            AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            AppError::Provider { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
            AppError::Network { .. } => (StatusCode::SERVICE_UNAVAILABLE, "network_error"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        let message = match self.kind() {
            ErrorKind::Internal => {
                tracing::error!(error = %self, "Internal server error");
                "Internal server error".to_string()
            }
            ErrorKind::Configuration => {
                tracing::error!(error = %self, "Request failed on missing configuration");
                self.to_string()
            }
            ErrorKind::Provider | ErrorKind::Network => {
                tracing::warn!(error = %self, "Upstream call failed");
                self.to_string()
            }
            ErrorKind::Auth if self.requires_reauthentication() => {
                tracing::info!(error = %self, "Client must log in with LinkedIn again");
                self.to_string()
            }
            ErrorKind::Auth | ErrorKind::Validation => self.to_string(),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
