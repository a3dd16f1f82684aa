// crates.io
use tracing::instrument::Instrumented;
use tracing_subscriber::EnvFilter;
// self
use crate::{_prelude::*, grant::GrantType};

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// A span builder used by relay operations.
#[derive(Clone, Debug)]
pub struct GrantSpan {
	span: tracing::Span,
}
impl GrantSpan {
	/// Creates a new span tagged with the provided grant + stage.
	pub fn new(grant: GrantType, stage: &'static str) -> Self {
		Self { span: tracing::info_span!("token_relay.grant", grant = grant.as_str(), stage) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// Installs the global `fmt` subscriber, honoring `RUST_LOG` when set.
pub fn init_subscriber() -> Result<(), Box<dyn StdError + Send + Sync>> {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

	tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
