//! Token values relayed back to the frontend.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// Provider-issued token. Serializes verbatim into relayed bodies; formatting never reveals it.
///
/// The value is kept as raw JSON so an unexpected provider encoding is relayed, not rejected.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(Value);
impl TokenSecret {
	/// Wraps a provider-issued token.
	pub fn new(value: impl Into<Value>) -> Self {
		Self(value.into())
	}

	/// Borrows the raw token. Keep it out of logs.
	pub fn expose(&self) -> &Value {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret({REDACTED})")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
