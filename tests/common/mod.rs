// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use post_assistant::config::Config;
use post_assistant::routes::create_router;
use post_assistant::AppState;
use std::sync::Arc;
use wiremock::MockServer;

/// Create a test app from the given configuration.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("Failed to build HTTP client"));
    (create_router(state.clone()), state)
}

/// Test configuration with every upstream pointed at a mock server.
#[allow(dead_code)]
pub fn mock_config(server: &MockServer) -> Config {
    Config {
        linkedin_oauth_url: format!("{}/oauth/v2", server.uri()),
        linkedin_api_url: server.uri(),
        ai_provider_url: format!("{}/v1/chat/completions", server.uri()),
        ..Config::default()
    }
}

/// Test configuration with every upstream pointed at a closed local port.
#[allow(dead_code)]
pub fn unreachable_config() -> Config {
    // Grab a free port, then close the listener so nothing listens there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let uri = format!("http://{}", listener.local_addr().expect("No local addr"));
    drop(listener);
    Config {
        linkedin_oauth_url: format!("{}/oauth/v2", uri),
        linkedin_api_url: uri.clone(),
        ai_provider_url: format!("{}/v1/chat/completions", uri),
        ..Config::default()
    }
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Collect a response body as a string.
#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Extract a query parameter from a URL.
#[allow(dead_code)]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
    })
}
