//! Route handlers.
//!
//! Bodies are read as raw bytes and parsed leniently, so a missing or malformed JSON body yields
//! the documented validation error rather than an extractor rejection.

// crates.io
use axum::{Json, body::Bytes, extract::State};
// self
use crate::{
	api::{ApiError, AppState, HealthResponse},
	grant::{AuthorizationCodeRequest, GrantType, RefreshTokenRequest, RefreshedTokenSet, TokenSet},
};

/// `POST /api/salesforce/token`
pub async fn exchange_token(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<TokenSet>, ApiError> {
	let request = AuthorizationCodeRequest::from_json_body(&body);

	state
		.relay
		.exchange_authorization_code(request)
		.await
		.map(Json)
		.map_err(|e| ApiError::new(GrantType::AuthorizationCode, e))
}

/// `POST /api/salesforce/refresh`
pub async fn refresh_token(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<RefreshedTokenSet>, ApiError> {
	let request = RefreshTokenRequest::from_json_body(&body);

	state
		.relay
		.refresh_access_token(request)
		.await
		.map(Json)
		.map_err(|e| ApiError::new(GrantType::RefreshToken, e))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
	Json(HealthResponse::default())
}
