// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post generation and publishing routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{
    GeneratePostResponse, ImagePayload, OAuthToken, PostRequest, PublishRequest, PublishResult,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/generate-post", post(generate_post))
        .route("/api/post-to-linkedin", post(post_to_linkedin))
}

/// Draft a LinkedIn post from a short description and optional image.
async fn generate_post(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PostRequest>, JsonRejection>,
) -> Result<Json<GeneratePostResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let image = request
        .image
        .as_ref()
        .map(ImagePayload::decode)
        .transpose()?;

    tracing::debug!(
        description_chars = request.description.chars().count(),
        has_image = image.is_some(),
        "Generating post"
    );

    let post = state
        .post_generator
        .generate(&request.description, image.as_ref())
        .await?;

    Ok(Json(post.into()))
}

/// Publish post text (and optional image) to the member's LinkedIn feed.
///
/// The access token comes from the body, or from an `Authorization: Bearer`
/// header when the body carries none.
async fn post_to_linkedin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: std::result::Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<PublishResult>> {
    let Json(request) = payload?;
    request.validate()?;

    let access_token = request
        .access_token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| bearer_token(&headers))
        .ok_or_else(|| AppError::Unauthorized("Missing LinkedIn access token".to_string()))?;

    let image = request
        .image
        .as_ref()
        .map(ImagePayload::decode)
        .transpose()?;

    let token = OAuthToken::presented(access_token, request.expires_at);
    let result = state.linkedin.publish(&token, &request.text, image).await?;

    tracing::info!(post_id = %result.post_id, "Post published to LinkedIn");

    Ok(Json(result))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
