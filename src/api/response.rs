//! Response bodies and the mapping from relay errors to HTTP statuses.

// crates.io
use axum::{
	Json,
	http::{HeaderValue, StatusCode, header::RETRY_AFTER},
	response::{IntoResponse, Response},
};
use serde_json::Value;
// self
use crate::{_prelude::*, grant::GrantType};

/// JSON error body. Absent fields are omitted from the wire representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
	/// Validation message, provider OAuth error code (verbatim), or generic failure label.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<Value>,
	/// Provider-supplied `error_description`, verbatim.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<Value>,
	/// Underlying failure text when the provider could not be reached.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// Relay failure bound to the grant whose route produced it.
#[derive(Debug)]
pub struct ApiError {
	/// Grant relayed by the failing route.
	pub grant: GrantType,
	/// Underlying relay error.
	pub error: Error,
}
impl ApiError {
	/// Binds `error` to `grant`.
	pub fn new(grant: GrantType, error: Error) -> Self {
		Self { grant, error }
	}

	/// Upstream Retry-After hint forwarded with provider rejections.
	pub fn retry_after_secs(&self) -> Option<u64> {
		match &self.error {
			Error::Provider(e) => e.retry_after_secs(),
			_ => None,
		}
	}

	/// Status code and body reported for this failure.
	pub fn parts(&self) -> (StatusCode, ErrorBody) {
		match &self.error {
			Error::Validation(e) => (
				StatusCode::BAD_REQUEST,
				ErrorBody { error: Some(e.to_string().into()), ..Default::default() },
			),
			Error::Provider(e) => (
				StatusCode::BAD_REQUEST,
				ErrorBody {
					error: e.error.clone(),
					description: e.description.clone(),
					..Default::default()
				},
			),
			Error::Transport(_) | Error::Config(_) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				ErrorBody {
					error: Some(self.grant.failure_message().into()),
					message: Some(self.error.to_string()),
					..Default::default()
				},
			),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, body) = self.parts();
		let mut response = (status, Json(body)).into_response();

		if let Some(secs) = self.retry_after_secs() {
			response.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
		}

		response
	}
}

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
	/// Always `ok` while the process serves requests.
	pub status: &'static str,
	/// Package name.
	pub service: &'static str,
	/// Package version.
	pub version: &'static str,
}
impl Default for HealthResponse {
	fn default() -> Self {
		Self {
			status: "ok",
			service: env!("CARGO_PKG_NAME"),
			version: env!("CARGO_PKG_VERSION"),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{ProviderError, TransportError, ValidationError};

	#[test]
	fn provider_rejection_omits_absent_fields() {
		let err = ApiError::new(
			GrantType::AuthorizationCode,
			ProviderError {
				grant: GrantType::AuthorizationCode,
				status: 401,
				error: Some("invalid_client".into()),
				description: None,
				retry_after: None,
			}
			.into(),
		);
		let (status, body) = err.parts();

		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(
			serde_json::to_value(body).expect("Error body should serialize."),
			serde_json::json!({ "error": "invalid_client" })
		);
	}

	#[test]
	fn provider_rejection_relays_structured_fields_and_retry_hint() {
		let response = ApiError::new(
			GrantType::RefreshToken,
			ProviderError {
				grant: GrantType::RefreshToken,
				status: 429,
				error: Some("rate_limited".into()),
				description: Some(serde_json::json!({ "detail": "slow down" })),
				retry_after: Some(Duration::seconds(30)),
			}
			.into(),
		)
		.into_response();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()),
			Some("30")
		);

		let (_, body) = ApiError::new(
			GrantType::RefreshToken,
			ProviderError {
				grant: GrantType::RefreshToken,
				status: 400,
				error: Some("invalid_grant".into()),
				description: Some(serde_json::json!({ "detail": "x" })),
				retry_after: None,
			}
			.into(),
		)
		.parts();

		assert_eq!(
			serde_json::to_value(body).expect("Error body should serialize."),
			serde_json::json!({ "error": "invalid_grant", "description": { "detail": "x" } })
		);
	}

	#[test]
	fn validation_and_transport_map_to_documented_statuses() {
		let (status, body) =
			ApiError::new(GrantType::RefreshToken, ValidationError::MissingRefreshToken.into())
				.parts();

		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body.error, Some(Value::from("Refresh token required")));

		let (status, body) = ApiError::new(
			GrantType::RefreshToken,
			TransportError::Other { message: "socket hang up".into() }.into(),
		)
		.parts();

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body.error, Some(Value::from("Token refresh failed")));
		assert!(body.message.is_some_and(|m| m.contains("socket hang up")));
	}
}
