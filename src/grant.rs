//! Grant vocabulary shared by the relay and the HTTP surface.
//!
//! Inbound request bodies are parsed leniently: anything that does not yield a non-empty string
//! for the grant's input field is treated as a missing input, so callers always receive the
//! documented validation error instead of an extractor rejection.

pub mod payload;
pub mod secret;

pub use payload::*;
pub use secret::*;

// crates.io
use oauth2::{AuthorizationCode, RefreshToken};
use serde_json::Value;
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{_prelude::*, config::RelayConfig};

/// OAuth 2.0 grant types relayed to the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
	/// Authorization Code grant issued after the user approves the frontend.
	AuthorizationCode,
	/// Refresh Token grant for long-lived sessions.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
		}
	}

	/// Name of the JSON field that carries the grant's input in inbound requests.
	pub const fn input_field(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "code",
			GrantType::RefreshToken => "refresh_token",
		}
	}

	/// Generic `error` value reported when the provider cannot be reached.
	pub const fn failure_message(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "Token exchange failed",
			GrantType::RefreshToken => "Token refresh failed",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Inbound body of `POST /api/salesforce/token`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthorizationCodeRequest {
	/// Authorization code returned to the frontend's redirect URI.
	pub code: Option<String>,
	/// Opaque state echoed by the provider; accepted but unused.
	pub state: Option<String>,
}
impl AuthorizationCodeRequest {
	/// Creates a request carrying `code`.
	pub fn new(code: impl Into<String>) -> Self {
		Self { code: Some(code.into()), state: None }
	}

	/// Parses a JSON body, treating malformed or mistyped input as absent.
	pub fn from_json_body(body: &[u8]) -> Self {
		let value = parse_object(body);

		Self {
			code: string_field(&value, GrantType::AuthorizationCode.input_field()),
			state: string_field(&value, "state"),
		}
	}

	/// Returns the authorization code when present and non-empty.
	pub fn authorization_code(&self) -> Option<AuthorizationCode> {
		non_empty(self.code.as_deref()).map(|code| AuthorizationCode::new(code.to_owned()))
	}
}

impl Debug for AuthorizationCodeRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationCodeRequest")
			.field("code_set", &self.code.is_some())
			.field("state", &self.state)
			.finish()
	}
}

/// Inbound body of `POST /api/salesforce/refresh`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RefreshTokenRequest {
	/// Refresh token previously issued by the code exchange.
	pub refresh_token: Option<String>,
}
impl RefreshTokenRequest {
	/// Creates a request carrying `refresh_token`.
	pub fn new(refresh_token: impl Into<String>) -> Self {
		Self { refresh_token: Some(refresh_token.into()) }
	}

	/// Parses a JSON body, treating malformed or mistyped input as absent.
	pub fn from_json_body(body: &[u8]) -> Self {
		let value = parse_object(body);

		Self { refresh_token: string_field(&value, GrantType::RefreshToken.input_field()) }
	}

	/// Returns the refresh token when present and non-empty.
	pub fn refresh_token(&self) -> Option<RefreshToken> {
		non_empty(self.refresh_token.as_deref()).map(|token| RefreshToken::new(token.to_owned()))
	}
}
impl Debug for RefreshTokenRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshTokenRequest")
			.field("refresh_token_set", &self.refresh_token.is_some())
			.finish()
	}
}

/// Ordered `application/x-www-form-urlencoded` body sent to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenForm {
	grant: GrantType,
	params: Vec<(&'static str, String)>,
}
impl TokenForm {
	/// Builds the `grant_type=authorization_code` form.
	pub fn authorization_code(config: &RelayConfig, code: &AuthorizationCode) -> Self {
		let mut form = Self::with_client(GrantType::AuthorizationCode, config);

		form.push("redirect_uri", config.redirect_uri.as_str());
		form.push("code", code.secret());

		form
	}

	/// Builds the `grant_type=refresh_token` form.
	pub fn refresh_token(config: &RelayConfig, refresh_token: &RefreshToken) -> Self {
		let mut form = Self::with_client(GrantType::RefreshToken, config);

		form.push("refresh_token", refresh_token.secret());

		form
	}

	/// Grant this form was built for.
	pub fn grant(&self) -> GrantType {
		self.grant
	}

	/// Returns the value recorded for `key`, if any.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.params.iter().find(|(name, _)| *name == key).map(|(_, value)| value.as_str())
	}

	/// Parameter names in submission order.
	pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.params.iter().map(|(name, _)| *name)
	}

	/// Serializes the form into its urlencoded wire representation.
	pub fn encode(&self) -> String {
		let mut serializer = FormSerializer::new(String::new());

		for (name, value) in &self.params {
			serializer.append_pair(name, value);
		}

		serializer.finish()
	}

	fn with_client(grant: GrantType, config: &RelayConfig) -> Self {
		let mut form = Self { grant, params: Vec::with_capacity(5) };

		form.push("grant_type", grant.as_str());
		form.push("client_id", config.client_id.as_str());
		form.push("client_secret", config.client_secret.secret());

		form
	}

	fn push(&mut self, name: &'static str, value: &str) {
		self.params.push((name, value.to_owned()));
	}
}
impl Debug for TokenForm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenForm")
			.field("grant", &self.grant)
			.field("keys", &self.keys().collect::<Vec<_>>())
			.finish()
	}
}

fn parse_object(body: &[u8]) -> Value {
	serde_json::from_slice::<Value>(body)
		.ok()
		.filter(Value::is_object)
		.unwrap_or(Value::Null)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
	value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}
