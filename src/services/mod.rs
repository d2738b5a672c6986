// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - outbound API clients.

pub mod linkedin;
pub mod linkedin_oauth;
pub mod oauth_state;
pub mod post_generator;

pub use linkedin::LinkedInClient;
pub use linkedin_oauth::LinkedInOAuth;
pub use oauth_state::OAuthStateSigner;
pub use post_generator::PostGenerator;
