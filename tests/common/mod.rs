//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::MockServer;
// self
use salesforce_token_relay::{
	api::{self, AppState},
	config::RelayConfig,
	http::ReqwestHttpClient,
	relay::TokenRelay,
	reqwest::{Client, redirect::Policy},
};

pub const CLIENT_ID: &str = "client-relay";
pub const CLIENT_SECRET: &str = "secret-relay";
pub const REDIRECT_URI: &str = "https://app.example.com/callback";
pub const TOKEN_PATH: &str = "/services/oauth2/token";

/// Builds a reqwest HTTP client suitable for talking to `httpmock` servers.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.redirect(Policy::none())
		.timeout(Duration::from_secs(5))
		.build()
		.expect("Failed to build Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Relay configuration pointing at `login_url`.
pub fn test_config(login_url: &str) -> Arc<RelayConfig> {
	test_config_with_timeout(login_url, Duration::from_secs(5))
}

/// Relay configuration pointing at `login_url` with an outbound `timeout`.
pub fn test_config_with_timeout(login_url: &str, timeout: Duration) -> Arc<RelayConfig> {
	let config = RelayConfig::builder()
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.redirect_uri(REDIRECT_URI)
		.login_url(login_url)
		.request_timeout(timeout)
		.build()
		.expect("Test configuration should build successfully.");

	Arc::new(config)
}

/// Plain-HTTP loopback login URL for `server`.
pub fn plain_http_login_url(server: &MockServer) -> String {
	format!("http://127.0.0.1:{}", server.port())
}

/// Relay built through [`TokenRelay::new`], so the configured timeout applies.
pub fn build_timed_relay(login_url: &str, timeout: Duration) -> TokenRelay {
	TokenRelay::new(test_config_with_timeout(login_url, timeout))
		.expect("Relay should build with the production client.")
}

/// Relay backed by reqwest and pointed at `server`.
pub fn build_reqwest_test_relay(server: &MockServer) -> TokenRelay {
	TokenRelay::with_http_client(test_config(&server.base_url()), test_reqwest_http_client())
}

/// Router backed by a relay pointed at `login_url`.
pub fn build_test_router(login_url: &str) -> axum::Router {
	let relay = TokenRelay::with_http_client(test_config(login_url), test_reqwest_http_client());

	api::router(AppState::new(relay))
}

/// Router backed by a relay whose outbound calls give up after `timeout`.
pub fn build_timed_router(login_url: &str, timeout: Duration) -> axum::Router {
	api::router(AppState::new(build_timed_relay(login_url, timeout)))
}
