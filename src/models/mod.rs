// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod oauth;
pub mod persona;
pub mod post;

pub use oauth::{AuthCallbackResponse, AuthorizationState, OAuthToken, PendingExchange};
pub use persona::Persona;
pub use post::{
    GeneratePostResponse, GeneratedPost, ImagePayload, ImageUpload, PostRequest, PublishRequest,
    PublishResult,
};
