// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn OAuth authentication routes.

use axum::{
    extract::{Query, State},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::no_store;
use crate::models::{AuthCallbackResponse, PendingExchange};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/linkedin", get(auth_start))
        .route("/api/auth/callback", get(auth_callback))
        .route_layer(middleware::from_fn(no_store))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// `json` returns the authorization URL instead of redirecting.
    #[serde(default)]
    format: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Start OAuth flow - redirect to LinkedIn authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
) -> Result<Response> {
    let redirect_uri = state.linkedin_oauth.redirect_uri()?;
    let oauth_state = state.state_signer.issue(redirect_uri, Utc::now())?;
    let auth_url = state.linkedin_oauth.authorization_url(&oauth_state)?;

    tracing::info!(
        redirect_uri = %redirect_uri,
        "Starting OAuth flow, redirecting to LinkedIn"
    );

    if params.format.as_deref() == Some("json") {
        return Ok(Json(AuthUrlResponse { auth_url }).into_response());
    }

    Ok(Redirect::temporary(&auth_url).into_response())
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    /// Set by LinkedIn when the user declines or the request is invalid
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth callback - verify state, exchange code for an access token.
///
/// The token is handed back to the caller; nothing is kept server-side.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<AuthCallbackResponse>> {
    // Check for OAuth errors
    if let Some(error) = params.error {
        tracing::warn!(
            error = %error,
            description = ?params.error_description,
            "OAuth error from LinkedIn"
        );
        return Err(AppError::Unauthorized(format!(
            "LinkedIn authorization failed: {}",
            params.error_description.unwrap_or(error)
        )));
    }

    let raw_state = params
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing OAuth state".to_string()))?;

    let authorization = state
        .state_signer
        .verify(raw_state, Utc::now())
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired OAuth state".to_string()))?;

    let pending = PendingExchange::new(
        params.code.as_deref().unwrap_or_default(),
        authorization.redirect_uri,
    )?;

    let token = state.linkedin_oauth.exchange_code(&pending).await?;

    tracing::info!(
        expires_at = %token.expires_at,
        "OAuth successful, returning token to client"
    );

    Ok(Json(token.into()))
}
