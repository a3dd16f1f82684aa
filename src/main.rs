//! Salesforce token relay server.

// crates.io
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::net::TcpListener;
// self
use salesforce_token_relay::{
	api::{self, AppState},
	config::{self, RelayArgs, RelayConfig},
	obs,
	relay::TokenRelay,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let dotenv = config::load_dotenv();

	obs::init_subscriber().map_err(|e| eyre!(e))?;

	if let Some(path) = dotenv {
		tracing::debug!(path = %path.display(), "Loaded environment file.");
	}

	let config = RelayConfig::try_from(RelayArgs::parse())?;
	let bind_addr = config.bind_addr;
	let token_url = config.token_url.as_str().to_owned();
	let relay = TokenRelay::new(config.into())?;
	let listener = TcpListener::bind(bind_addr).await?;

	tracing::info!(addr = %listener.local_addr()?, %token_url, "Relay listening.");

	api::serve(listener, AppState::new(relay)).await?;

	Ok(())
}
