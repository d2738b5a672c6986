// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Post Assistant: draft LinkedIn posts with an AI model and publish them.
//!
//! This crate provides the backend API: LinkedIn OAuth login, post
//! generation through a chat completion provider, and publishing through
//! LinkedIn's UGC post API.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{LinkedInClient, LinkedInOAuth, OAuthStateSigner, PostGenerator};

/// Shared application state.
///
/// Immutable after startup; tokens travel with each request instead of
/// living here.
pub struct AppState {
    pub config: Config,
    pub state_signer: OAuthStateSigner,
    pub linkedin_oauth: LinkedInOAuth,
    pub linkedin: LinkedInClient,
    pub post_generator: PostGenerator,
}

impl AppState {
    /// Build all services around one shared HTTP connection pool.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            state_signer: OAuthStateSigner::new(config.oauth_state_key.clone()),
            linkedin_oauth: LinkedInOAuth::new(http.clone(), &config),
            linkedin: LinkedInClient::new(http.clone(), &config),
            post_generator: PostGenerator::new(http, &config),
            config,
        })
    }
}
