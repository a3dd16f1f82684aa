// self
use crate::{grant::GrantType, obs::GrantOutcome};

/// Counter incremented once per relay attempt and once per terminal outcome.
pub const GRANT_COUNTER: &str = "token_relay_grant_total";

/// Records `outcome` for `grant` through the global metrics recorder.
#[cfg(feature = "metrics")]
pub fn record_grant_outcome(grant: GrantType, outcome: GrantOutcome) {
	metrics::counter!(GRANT_COUNTER, "grant" => grant.as_str(), "outcome" => outcome.as_str())
		.increment(1);
}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
pub fn record_grant_outcome(_grant: GrantType, _outcome: GrantOutcome) {}
