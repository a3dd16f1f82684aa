//! JSON payloads exchanged with the token endpoint and relayed back to callers.
//!
//! Token fields are passed through verbatim, whatever their JSON type; anything the provider
//! omits is omitted from the relayed body as well.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{_prelude::*, error::TransportError, grant::TokenSecret};

/// Tokens issued by the authorization code exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
	/// Access token for the Salesforce REST APIs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<TokenSecret>,
	/// Base URL of the org the tokens belong to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub instance_url: Option<Value>,
	/// Long-lived refresh token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime hint in seconds, relayed exactly as the provider encoded it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<Value>,
}

/// Tokens issued by the refresh grant. Never carries a refresh token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RefreshedTokenSet {
	/// Fresh access token.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub access_token: Option<TokenSecret>,
	/// Base URL of the org the token belongs to.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instance_url: Option<Value>,
	/// Lifetime hint in seconds, relayed exactly as the provider encoded it.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<Value>,
}
impl From<TokenSet> for RefreshedTokenSet {
	fn from(tokens: TokenSet) -> Self {
		Self {
			access_token: tokens.access_token,
			instance_url: tokens.instance_url,
			expires_in: tokens.expires_in,
		}
	}
}

/// OAuth error body returned with a non-success status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderErrorPayload {
	/// OAuth `error` code (e.g. `invalid_grant`).
	#[serde(default)]
	pub error: Option<Value>,
	/// Human-readable `error_description`.
	#[serde(default)]
	pub error_description: Option<Value>,
}

/// Deserializes a token endpoint body, reporting the JSON path of any mismatch.
pub(crate) fn parse_json<T>(body: &[u8], status: u16) -> Result<T, TransportError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransportError::MalformedResponse { source, status })
}
