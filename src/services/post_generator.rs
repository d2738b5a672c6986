// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI post generation through an OpenAI-compatible chat completion API.
//!
//! DeepSeek is the default provider. One completion request is made per
//! call; there is no caching and no fallback text.

use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::models::post::MAX_DESCRIPTION_CHARS;
use crate::models::{GeneratedPost, ImageUpload, Persona};
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str =
    "You are a professional LinkedIn content creator with expertise in technology and AI.";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

/// Client for the text generation provider.
#[derive(Clone)]
pub struct PostGenerator {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    persona: Persona,
}

impl PostGenerator {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.ai_provider_url.clone(),
            api_key: config.ai_provider_api_key.clone(),
            model: config.ai_model.clone(),
            persona: config.persona.clone(),
        }
    }

    /// Generate a LinkedIn post from a description.
    ///
    /// The description is checked before the API key, and both before
    /// any network traffic.
    pub async fn generate(
        &self,
        description: &str,
        image: Option<&ImageUpload>,
    ) -> Result<GeneratedPost, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::BadRequest(
                "Description must not be empty".to_string(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(AppError::BadRequest(format!(
                "Description exceeds {} characters",
                MAX_DESCRIPTION_CHARS
            )));
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ConfigError::Missing("AI_PROVIDER_API_KEY"))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: self.build_prompt(description, image),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::info!(
            model = %self.model,
            description_chars = description.chars().count(),
            with_image = image.is_some(),
            "Requesting post generation"
        );

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::network(AppError::AI_PROVIDER, e))?;

        let completion: ChatResponse = check_response_json(response).await?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| clean_post(&content))
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::provider(
                AppError::AI_PROVIDER,
                "Completion contained no text",
            ));
        }

        tracing::info!(chars = text.chars().count(), "Post generated");
        Ok(GeneratedPost { text })
    }

    /// Build the user prompt.
    fn build_prompt(&self, description: &str, image: Option<&ImageUpload>) -> String {
        let image_note = image
            .map(|img| {
                format!(
                    "An image accompanies this post ({}, {}, {} KiB). \
                     Refer to it naturally without describing pixels you cannot see.\n\n",
                    img.filename,
                    img.content_type,
                    img.bytes.len().div_ceil(1024)
                )
            })
            .unwrap_or_default();

        format!(
            "Create a LinkedIn post about:\n{description}\n\n\
             {image_note}\
             {persona}\n\
             Guidelines:\n\
             1. If this is news or a launch, open with a clear announcement.\n\
             2. Share one concrete insight or lesson learned.\n\
             3. Keep it under 1300 characters, in short paragraphs.\n\
             4. Ask at most one question.\n\
             5. End with a clear call to action.\n\
             6. Include 2-3 relevant hashtags from the preferred list.\n\
             7. Do not use Markdown formatting.\n\
             Reply with the post text only.",
            persona = self.persona.prompt_context(),
        )
    }
}

/// Strip Markdown bold markers and surrounding whitespace.
fn clean_post(raw: &str) -> String {
    raw.replace("**", "").trim().to_string()
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("AI provider rate limit hit (429)");
            return Err(AppError::RateLimited {
                provider: AppError::AI_PROVIDER,
            });
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AppError::provider(
                AppError::AI_PROVIDER,
                format!("API key rejected (HTTP {})", status.as_u16()),
            ));
        }

        return Err(AppError::provider(
            AppError::AI_PROVIDER,
            format!("HTTP {}: {}", status, body),
        ));
    }

    response.json().await.map_err(|e| {
        AppError::provider(AppError::AI_PROVIDER, format!("JSON parse error: {}", e))
    })
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
