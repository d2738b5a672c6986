// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Request and response models for post generation and publishing.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Longest description accepted for generation.
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
/// LinkedIn's limit on share commentary.
pub const MAX_POST_CHARS: usize = 3000;
/// Largest decoded image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];
const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// Body of `POST /api/generate-post`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    /// Missing counts as empty
    #[serde(default)]
    #[validate(custom(function = "description_length"))]
    pub description: String,
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

fn description_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, MAX_DESCRIPTION_CHARS, "description is too long")
}

fn post_text_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, MAX_POST_CHARS, "post exceeds LinkedIn's character limit")
}

/// Length limits apply to the trimmed text, as the services see it.
fn trimmed_length(
    value: &str,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().chars().count() > max {
        let mut err = ValidationError::new("length");
        err.message = Some(message.into());
        return Err(err);
    }
    Ok(())
}

/// Base64-encoded image as sent by the frontend.
///
/// `data` may be raw base64 or a `data:image/png;base64,...` URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    pub data: String,
}

/// Decoded image held in memory for the duration of a request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImagePayload {
    /// Decode and validate the image.
    pub fn decode(&self) -> Result<ImageUpload, AppError> {
        let (data_url_type, encoded) = split_data_url(self.data.trim());

        let content_type = self
            .content_type
            .as_deref()
            .or(data_url_type)
            .unwrap_or(DEFAULT_IMAGE_TYPE)
            .to_ascii_lowercase();

        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unsupported image type '{}'",
                content_type
            )));
        }

        let bytes = BASE64
            .decode(encoded)
            .map_err(|_| AppError::BadRequest("Image data is not valid base64".to_string()))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Image data is empty".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(format!(
                "Image exceeds {} bytes",
                MAX_IMAGE_BYTES
            )));
        }

        Ok(ImageUpload {
            filename: self
                .filename
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| "image".to_string()),
            content_type,
            bytes,
        })
    }
}

/// Split `data:<type>;base64,<payload>` into its type and payload.
fn split_data_url(data: &str) -> (Option<&str>, &str) {
    data.strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .map(|(meta, payload)| (meta.strip_suffix(";base64"), payload))
        .unwrap_or((None, data))
}

/// Text produced by the AI provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPost {
    pub text: String,
}

/// Response of `POST /api/generate-post`.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePostResponse {
    pub generated_text: String,
}

impl From<GeneratedPost> for GeneratePostResponse {
    fn from(post: GeneratedPost) -> Self {
        Self {
            generated_text: post.text,
        }
    }
}

/// Body of `POST /api/post-to-linkedin`.
///
/// Not `Debug`: it carries the access token.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    #[validate(custom(function = "post_text_length"))]
    pub text: String,
    /// May instead be supplied as an `Authorization: Bearer` header
    #[serde(default)]
    pub access_token: Option<String>,
    /// Expiry returned by the OAuth callback, if the client kept it
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

/// Outcome of publishing a post.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub post_id: String,
    pub post_url: String,
    pub success: bool,
}

impl PublishResult {
    pub fn published(post_id: String) -> Self {
        let post_url = format!("https://www.linkedin.com/feed/update/{}", post_id);
        Self {
            post_id,
            post_url,
            success: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(data: &str, content_type: Option<&str>) -> ImagePayload {
        ImagePayload {
            filename: Some("launch.png".to_string()),
            content_type: content_type.map(str::to_string),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_decode_raw_base64() {
        let image = payload(&BASE64.encode(b"png-bytes"), Some("image/png"))
            .decode()
            .unwrap();

        assert_eq!(image.bytes, b"png-bytes");
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.filename, "launch.png");
    }

    #[test]
    fn test_decode_data_url_takes_type_from_prefix() {
        let data = format!("data:image/gif;base64,{}", BASE64.encode(b"gif"));
        let image = payload(&data, None).decode().unwrap();

        assert_eq!(image.content_type, "image/gif");
        assert_eq!(image.bytes, b"gif");
    }

    #[test]
    fn test_decode_defaults_to_jpeg() {
        let image = payload(&BASE64.encode(b"jpg"), None).decode().unwrap();
        assert_eq!(image.content_type, "image/jpeg");
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(payload("%%%not base64%%%", None).decode().is_err());
        assert!(payload("", None).decode().is_err());
        assert!(payload(&BASE64.encode(b"svg"), Some("image/svg+xml"))
            .decode()
            .is_err());
    }

    #[test]
    fn test_publish_result_url() {
        let result = PublishResult::published("urn:li:share:123".to_string());
        assert!(result.success);
        assert_eq!(
            result.post_url,
            "https://www.linkedin.com/feed/update/urn:li:share:123"
        );
    }

    #[test]
    fn test_description_length_validation() {
        let request = PostRequest {
            description: "x".repeat(MAX_DESCRIPTION_CHARS + 1),
            image: None,
        };
        assert!(request.validate().is_err());

        let request = PostRequest {
            description: "x".repeat(MAX_DESCRIPTION_CHARS),
            image: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_post_text_limit_ignores_surrounding_whitespace() {
        let request = PublishRequest {
            text: format!("{}\n\n  ", "x".repeat(MAX_POST_CHARS)),
            access_token: None,
            expires_at: None,
            image: None,
        };
        assert!(request.validate().is_ok());

        let request = PublishRequest {
            text: "x".repeat(MAX_POST_CHARS + 1),
            access_token: None,
            expires_at: None,
            image: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_missing_description_deserializes_as_empty() {
        let request: PostRequest = serde_json::from_str("{}").unwrap();
        assert!(request.description.is_empty());
    }
}
