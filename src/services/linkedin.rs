// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn API client for publishing posts.
//!
//! Handles:
//! - Resolving the member URN of the token owner
//! - Image asset registration and upload
//! - UGC post creation
//!
//! Tokens are never refreshed here. An expired token goes back to the
//! caller so the user can log in again.

use crate::config::Config;
use crate::error::AppError;
use crate::models::post::MAX_POST_CHARS;
use crate::models::{ImageUpload, OAuthToken, PublishResult};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

const RESTLI_PROTOCOL_HEADER: &str = "X-Restli-Protocol-Version";
const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";
const RESTLI_ID_HEADER: &str = "x-restli-id";
const FEEDSHARE_IMAGE_RECIPE: &str = "urn:li:digitalmediaRecipe:feedshare-image";

/// LinkedIn REST client.
#[derive(Clone)]
pub struct LinkedInClient {
    http: reqwest::Client,
    base_url: String,
}

impl LinkedInClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.linkedin_api_url.clone(),
        }
    }

    /// Publish a post, uploading the image first if there is one.
    pub async fn publish(
        &self,
        token: &OAuthToken,
        text: &str,
        image: Option<ImageUpload>,
    ) -> Result<PublishResult, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Post text must not be empty".to_string()));
        }
        if text.chars().count() > MAX_POST_CHARS {
            return Err(AppError::BadRequest(format!(
                "Post exceeds LinkedIn's {} character limit",
                MAX_POST_CHARS
            )));
        }

        if token.is_expired(chrono::Utc::now()) {
            tracing::warn!(expires_at = %token.expires_at, "Refusing to publish with expired token");
            return Err(AppError::ExpiredToken);
        }

        let author = self.member_urn(token).await?;

        let media = match image {
            Some(image) => Some(self.upload_image(token, &author, image).await?),
            None => None,
        };

        let post = UgcPost::new(&author, text, media.as_ref());

        tracing::info!(
            author = %author,
            with_image = media.is_some(),
            "Creating LinkedIn post"
        );

        let response = self
            .http
            .post(format!("{}/v2/ugcPosts", self.base_url))
            .bearer_auth(&token.access_token)
            .header(RESTLI_PROTOCOL_HEADER, RESTLI_PROTOCOL_VERSION)
            .json(&post)
            .send()
            .await
            .map_err(|e| AppError::network(AppError::LINKEDIN, e))?;

        let response = check_response(response).await?;

        let header_id = response
            .headers()
            .get(RESTLI_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(AppError::LINKEDIN, e))?;

        let post_id = serde_json::from_str::<UgcPostResponse>(&body)
            .ok()
            .and_then(|r| r.id)
            .or(header_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                AppError::provider(AppError::LINKEDIN, "Post created but no id was returned")
            })?;

        let result = PublishResult::published(post_id);
        tracing::info!(post_id = %result.post_id, post_url = %result.post_url, "LinkedIn post created");
        Ok(result)
    }

    /// Resolve the `urn:li:person:...` URN of the token owner.
    pub async fn member_urn(&self, token: &OAuthToken) -> Result<String, AppError> {
        let response = self
            .http
            .get(format!("{}/v2/userinfo", self.base_url))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AppError::network(AppError::LINKEDIN, e))?;

        let info: UserInfo = parse_json(check_response(response).await?).await?;

        if info.sub.is_empty() {
            return Err(AppError::provider(
                AppError::LINKEDIN,
                "No member id in userinfo response",
            ));
        }

        Ok(format!("urn:li:person:{}", info.sub))
    }

    /// Register an image asset and upload its bytes. Returns the asset URN.
    async fn upload_image(
        &self,
        token: &OAuthToken,
        owner: &str,
        image: ImageUpload,
    ) -> Result<UploadedMedia, AppError> {
        let request = RegisterUploadRequest {
            register_upload_request: RegisterUpload {
                recipes: [FEEDSHARE_IMAGE_RECIPE],
                owner,
                service_relationships: [ServiceRelationship {
                    relationship_type: "OWNER",
                    identifier: "urn:li:userGeneratedContent",
                }],
            },
        };

        let response = self
            .http
            .post(format!("{}/v2/assets?action=registerUpload", self.base_url))
            .bearer_auth(&token.access_token)
            .header(RESTLI_PROTOCOL_HEADER, RESTLI_PROTOCOL_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::network(AppError::LINKEDIN, e))?;

        let registered: RegisterUploadResponse =
            parse_json(check_response(response).await?).await?;
        let asset = registered.value.asset;
        let upload_url = registered.value.upload_mechanism.http_request.upload_url;

        tracing::info!(
            asset = %asset,
            bytes = image.bytes.len(),
            "Uploading image to LinkedIn"
        );

        let response = self
            .http
            .put(&upload_url)
            .bearer_auth(&token.access_token)
            .header(CONTENT_TYPE, image.content_type.as_str())
            .body(image.bytes)
            .send()
            .await
            .map_err(|e| AppError::network(AppError::LINKEDIN, e))?;

        check_response(response).await?;

        Ok(UploadedMedia {
            asset,
            title: image.filename,
        })
    }
}

/// Check response status, mapping failures onto the error taxonomy.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, body = %body, "LinkedIn API call failed");

    let err = match status.as_u16() {
        401 => AppError::ExpiredToken,
        403 => AppError::Forbidden(format!("LinkedIn denied the request: {}", body)),
        400 | 422 => AppError::MalformedPayload {
            provider: AppError::LINKEDIN,
            message: body,
        },
        429 => AppError::RateLimited {
            provider: AppError::LINKEDIN,
        },
        _ => AppError::provider(AppError::LINKEDIN, format!("HTTP {}: {}", status, body)),
    };
    Err(err)
}

async fn parse_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    response.json().await.map_err(|e| {
        AppError::provider(AppError::LINKEDIN, format!("JSON parse error: {}", e))
    })
}

/// Image asset that finished uploading.
struct UploadedMedia {
    asset: String,
    title: String,
}

// ─── UGC post payload ────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UgcPost<'a> {
    author: &'a str,
    lifecycle_state: &'static str,
    specific_content: SpecificContent<'a>,
    visibility: Visibility,
}

impl<'a> UgcPost<'a> {
    fn new(author: &'a str, text: &'a str, media: Option<&'a UploadedMedia>) -> Self {
        let (category, media) = match media {
            Some(m) => (
                "IMAGE",
                vec![ShareMedia {
                    status: "READY",
                    media: &m.asset,
                    title: Text { text: &m.title },
                }],
            ),
            None => ("NONE", Vec::new()),
        };

        Self {
            author,
            lifecycle_state: "PUBLISHED",
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: Text { text },
                    share_media_category: category,
                    media,
                },
            },
            visibility: Visibility {
                member_network_visibility: "PUBLIC",
            },
        }
    }
}

#[derive(Serialize)]
struct SpecificContent<'a> {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    share_content: ShareContent<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareContent<'a> {
    share_commentary: Text<'a>,
    share_media_category: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    media: Vec<ShareMedia<'a>>,
}

#[derive(Serialize)]
struct ShareMedia<'a> {
    status: &'static str,
    media: &'a str,
    title: Text<'a>,
}

#[derive(Serialize)]
struct Text<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    member_network_visibility: &'static str,
}

#[derive(Deserialize)]
struct UgcPostResponse {
    #[serde(default)]
    id: Option<String>,
}

// ─── Asset registration ──────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterUploadRequest<'a> {
    register_upload_request: RegisterUpload<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterUpload<'a> {
    recipes: [&'static str; 1],
    owner: &'a str,
    service_relationships: [ServiceRelationship; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceRelationship {
    relationship_type: &'static str,
    identifier: &'static str,
}

#[derive(Deserialize)]
struct RegisterUploadResponse {
    value: RegisterUploadValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterUploadValue {
    asset: String,
    upload_mechanism: UploadMechanism,
}

#[derive(Deserialize)]
struct UploadMechanism {
    #[serde(rename = "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest")]
    http_request: MediaUploadHttpRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaUploadHttpRequest {
    upload_url: String,
}

/// OpenID Connect userinfo response (only the subject is needed).
#[derive(Deserialize)]
struct UserInfo {
    sub: String,
}
