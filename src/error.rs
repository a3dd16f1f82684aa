//! Relay-level error types shared across configuration, transport, and request handling.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, grant::GrantType};

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; only raised while starting up.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller omitted a required input; no outbound call was made.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Provider answered the grant with a non-success status.
	#[error(transparent)]
	Provider(#[from] ProviderError),
	/// Provider could not be reached or answered with an unreadable payload.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Startup configuration failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting is absent or empty.
	#[error("Setting `{name}` must be provided and non-empty.")]
	MissingSetting {
		/// Environment variable backing the setting.
		name: &'static str,
	},
	/// A URL-valued setting cannot be parsed.
	#[error("Setting `{name}` is not a valid absolute URL.")]
	InvalidUrl {
		/// Environment variable backing the setting.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Login URL must use HTTPS unless it points at a loopback host.
	#[error("The login URL must use HTTPS: {url}.")]
	InsecureLoginUrl {
		/// Login URL that failed validation.
		url: String,
	},
	/// Outbound timeout must be a positive duration.
	#[error("The request timeout must be positive.")]
	NonPositiveTimeout,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Missing caller input, detected before contacting the provider.
///
/// The display strings are part of the HTTP contract and are returned verbatim in the
/// `error` field of the response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// `code` was absent or empty.
	#[error("Authorization code required")]
	MissingAuthorizationCode,
	/// `refresh_token` was absent or empty.
	#[error("Refresh token required")]
	MissingRefreshToken,
}
impl ValidationError {
	/// Returns the validation failure raised when `grant` lacks its input.
	pub const fn missing_input(grant: GrantType) -> Self {
		match grant {
			GrantType::AuthorizationCode => Self::MissingAuthorizationCode,
			GrantType::RefreshToken => Self::MissingRefreshToken,
		}
	}
}

/// OAuth error returned by the token endpoint alongside a non-success status.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error(
	"Token endpoint rejected the {grant} grant with HTTP {status}: {}.",
	oauth_code(.error)
)]
pub struct ProviderError {
	/// Grant that was rejected.
	pub grant: GrantType,
	/// HTTP status code returned by the provider.
	pub status: u16,
	/// Provider-supplied OAuth `error` field, verbatim.
	pub error: Option<Value>,
	/// Provider-supplied OAuth `error_description` field, verbatim.
	pub description: Option<Value>,
	/// Retry-After hint from upstream, forwarded to the caller.
	pub retry_after: Option<Duration>,
}
impl ProviderError {
	/// OAuth `error` code rendered as text, for logs.
	pub fn error_code(&self) -> String {
		oauth_code(&self.error)
	}

	/// Retry-After hint in whole seconds, when upstream supplied a positive one.
	pub fn retry_after_secs(&self) -> Option<u64> {
		self.retry_after.and_then(|hint| u64::try_from(hint.whole_seconds()).ok())
	}
}

/// Transport-level failures (network, timeouts, unreadable payloads).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint: {source}.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the configured timeout.
	#[error("Request timed out while calling the token endpoint: {source}.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint: {0}.")]
	Io(#[from] std::io::Error),
	/// Outbound request could not be assembled.
	#[error("Token request could not be constructed: {0}.")]
	Request(#[from] oauth2::http::Error),
	/// Token endpoint responded with a body that is not the expected JSON.
	#[error("Token endpoint returned malformed JSON: {source}.")]
	MalformedResponse {
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code that accompanied the body.
		status: u16,
	},
	/// HTTP client failed in a way it could only describe as text.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Client-supplied failure description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}

fn oauth_code(error: &Option<Value>) -> String {
	match error {
		Some(Value::String(code)) => code.clone(),
		Some(other) => other.to_string(),
		None => "unspecified error".into(),
	}
}
