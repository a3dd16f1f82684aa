mod common;

// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use salesforce_token_relay::{
	error::{Error, TransportError},
	grant::{AuthorizationCodeRequest, GrantType},
};

#[tokio::test]
async fn exchange_posts_form_and_relays_tokens() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.header("accept", "application/json")
				.body(
					"grant_type=authorization_code&client_id=client-relay&client_secret=secret-relay\
					 &redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback&code=aPrx%2Fcode%3D%3D",
				);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"00D-AT1\",\"instance_url\":\"https://na1.salesforce.com\",\
				 \"refresh_token\":\"5Aep-RT1\",\"expires_in\":7200,\"token_type\":\"Bearer\"}",
			);
		})
		.await;
	let relay = build_reqwest_test_relay(&server);
	let tokens = relay
		.exchange_authorization_code(AuthorizationCodeRequest::new("aPrx/code=="))
		.await
		.expect("Code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(
		serde_json::to_value(&tokens).expect("Token set should serialize."),
		json!({
			"access_token": "00D-AT1",
			"instance_url": "https://na1.salesforce.com",
			"refresh_token": "5Aep-RT1",
			"expires_in": 7200
		})
	);
}

#[tokio::test]
async fn consumed_code_surfaces_provider_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400).header("content-type", "application/json").body(
				"{\"error\":\"invalid_grant\",\"error_description\":\"authentication failure\"}",
			);
		})
		.await;
	let relay = build_reqwest_test_relay(&server);
	let err = relay
		.exchange_authorization_code(AuthorizationCodeRequest::new("used-code"))
		.await
		.expect_err("Consumed codes should be rejected.");

	mock.assert_calls_async(1).await;

	match err {
		Error::Provider(provider) => {
			assert_eq!(provider.grant, GrantType::AuthorizationCode);
			assert_eq!(provider.status, 400);
			assert_eq!(provider.error, Some(json!("invalid_grant")));
			assert_eq!(provider.description, Some(json!("authentication failure")));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn malformed_success_body_is_a_transport_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "text/html").body("<html>maintenance</html>");
		})
		.await;
	let relay = build_reqwest_test_relay(&server);
	let err = relay
		.exchange_authorization_code(AuthorizationCodeRequest::new("C1"))
		.await
		.expect_err("Non-JSON bodies should be rejected.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Transport(TransportError::MalformedResponse { status: 200, .. })
	));
}

#[tokio::test]
async fn retry_after_hint_is_captured_on_rejection() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(429)
				.header("content-type", "application/json")
				.header("retry-after", "30")
				.body("{\"error\":\"rate_limited\"}");
		})
		.await;
	let relay = build_reqwest_test_relay(&server);
	let err = relay
		.exchange_authorization_code(AuthorizationCodeRequest::new("C1"))
		.await
		.expect_err("Throttled exchanges should fail.");

	match err {
		Error::Provider(provider) => {
			assert_eq!(provider.status, 429);
			assert_eq!(provider.retry_after.map(|d| d.whole_seconds()), Some(30));
			assert!(provider.description.is_none());
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn slow_provider_times_out_as_transport_error() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"late\"}")
				.delay(Duration::from_secs(3));
		})
		.await;
	let relay = build_timed_relay(&plain_http_login_url(&server), Duration::from_secs(1));
	let err = relay
		.exchange_authorization_code(AuthorizationCodeRequest::new("C1"))
		.await
		.expect_err("Slow providers should time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })), "{err:?}");
}
