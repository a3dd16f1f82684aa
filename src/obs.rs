//! Observability helpers for relayed grants.
//!
//! - Every relay operation runs inside a `token_relay.grant` span carrying the `grant` and
//!   `stage` fields.
//! - Enable the `metrics` feature to increment the `token_relay_grant_total` counter for every
//!   attempt and its outcome, labeled by `grant` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each relayed grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantOutcome {
	/// Entry to a relay operation.
	Attempt,
	/// Provider issued tokens.
	Success,
	/// Caller input was rejected before contacting the provider.
	Rejected,
	/// Provider refused the grant or could not be reached.
	Failure,
}
impl GrantOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantOutcome::Attempt => "attempt",
			GrantOutcome::Success => "success",
			GrantOutcome::Rejected => "rejected",
			GrantOutcome::Failure => "failure",
		}
	}

	/// Classifies the result of a relay operation.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => GrantOutcome::Success,
			Err(Error::Validation(_)) => GrantOutcome::Rejected,
			Err(_) => GrantOutcome::Failure,
		}
	}
}
impl Display for GrantOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
