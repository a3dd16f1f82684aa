//! HTTP surface of the relay.
//!
//! Routes:
//! - `POST /api/salesforce/token` exchanges `{ "code" }` for the provider's token set.
//! - `POST /api/salesforce/refresh` trades `{ "refresh_token" }` for a fresh access token.
//! - `GET /health` reports liveness.
//!
//! Every route answers cross-origin requests from any origin.

pub mod handlers;
pub mod response;

pub use response::*;

// std
use std::{future, io};
// crates.io
use axum::{
	Router,
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
// self
use crate::{_prelude::*, relay::TokenRelay};

/// Route of the authorization code exchange.
pub const TOKEN_ROUTE: &str = "/api/salesforce/token";
/// Route of the refresh grant.
pub const REFRESH_ROUTE: &str = "/api/salesforce/refresh";
/// Route of the liveness probe.
pub const HEALTH_ROUTE: &str = "/health";

/// Shared router state.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Relay shared by every handler.
	pub relay: Arc<TokenRelay>,
}
impl AppState {
	/// Wraps `relay` for use as router state.
	pub fn new(relay: impl Into<Arc<TokenRelay>>) -> Self {
		Self { relay: relay.into() }
	}
}

/// Builds the relay router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
	let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

	Router::new()
		.route(TOKEN_ROUTE, post(handlers::exchange_token))
		.route(REFRESH_ROUTE, post(handlers::refresh_token))
		.route(HEALTH_ROUTE, get(handlers::health))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Serves the relay on `listener` until Ctrl+C or SIGTERM is received.
pub async fn serve(listener: TcpListener, state: AppState) -> io::Result<()> {
	axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;

	tracing::info!("Relay shut down gracefully.");

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %e, "Failed to install the Ctrl+C handler.");

			future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};

		match signal(SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(e) => {
				tracing::error!(error = %e, "Failed to install the SIGTERM handler.");

				future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down."),
		_ = terminate => tracing::info!("Received SIGTERM, shutting down."),
	}
}
