//! Process-wide relay configuration.
//!
//! [`RelayArgs`] is parsed once at startup from command-line flags with environment fallbacks
//! (a `.env` file is honored through [`load_dotenv`]). It is validated into an immutable
//! [`RelayConfig`] that handlers share through router state.

// std
use std::{
	net::{IpAddr, Ipv4Addr, SocketAddr},
	path::PathBuf,
	time::Duration as StdDuration,
};
// crates.io
use clap::Parser;
use oauth2::{ClientId, ClientSecret, RedirectUrl, TokenUrl};
use url::Host;
// self
use crate::{_prelude::*, error::ConfigError};

/// Login host for production orgs.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";
/// Login host for sandbox orgs.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
/// Path of the OAuth 2.0 token endpoint below the login host.
pub const TOKEN_ENDPOINT_PATH: &str = "/services/oauth2/token";
/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default bound on the outbound token request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const CLIENT_ID_VAR: &str = "SALESFORCE_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "SALESFORCE_CLIENT_SECRET";
const REDIRECT_URI_VAR: &str = "SALESFORCE_REDIRECT_URI";
const LOGIN_URL_VAR: &str = "SALESFORCE_LOGIN_URL";

/// Loads `.env` from the working directory (or its ancestors), returning its path when found.
pub fn load_dotenv() -> Option<PathBuf> {
	dotenvy::dotenv().ok()
}

/// Command-line flags, each backed by an environment variable.
#[derive(Clone, Parser)]
#[command(name = "salesforce-token-relay", version, about, long_about = None)]
pub struct RelayArgs {
	/// Connected app consumer key.
	#[arg(long, env = "SALESFORCE_CLIENT_ID")]
	pub client_id: Option<String>,
	/// Connected app consumer secret.
	#[arg(long, env = "SALESFORCE_CLIENT_SECRET", hide_env_values = true)]
	pub client_secret: Option<String>,
	/// Callback URL registered on the connected app.
	#[arg(long, env = "SALESFORCE_REDIRECT_URI")]
	pub redirect_uri: Option<String>,
	/// Login host; use the sandbox host for sandbox orgs.
	#[arg(long, env = "SALESFORCE_LOGIN_URL", default_value = PRODUCTION_LOGIN_URL)]
	pub login_url: String,
	/// Address to listen on.
	#[arg(long, env = "RELAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
	pub host: IpAddr,
	/// Port to listen on.
	#[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
	pub port: u16,
	/// Upper bound, in seconds, on each outbound token request.
	#[arg(
		long = "request-timeout",
		env = "RELAY_REQUEST_TIMEOUT_SECS",
		default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
	)]
	pub request_timeout_secs: u64,
}
impl Debug for RelayArgs {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RelayArgs")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("login_url", &self.login_url)
			.field("host", &self.host)
			.field("port", &self.port)
			.field("request_timeout_secs", &self.request_timeout_secs)
			.finish()
	}
}
impl TryFrom<RelayArgs> for RelayConfig {
	type Error = ConfigError;

	fn try_from(args: RelayArgs) -> Result<Self, Self::Error> {
		let mut builder = RelayConfig::builder()
			.login_url(args.login_url)
			.host(args.host)
			.port(args.port)
			.request_timeout(StdDuration::from_secs(args.request_timeout_secs));

		builder.client_id = args.client_id;
		builder.client_secret = args.client_secret;
		builder.redirect_uri = args.redirect_uri;

		builder.build()
	}
}

/// Immutable settings shared by every request.
#[derive(Clone, Debug)]
pub struct RelayConfig {
	/// OAuth 2.0 client identifier (consumer key).
	pub client_id: ClientId,
	/// OAuth 2.0 client secret (consumer secret); redacted in `Debug` output.
	pub client_secret: ClientSecret,
	/// Redirect URI sent with the authorization code exchange.
	pub redirect_uri: RedirectUrl,
	/// Login host the token endpoint hangs off.
	pub login_url: Url,
	/// Token endpoint every grant is posted to.
	pub token_url: TokenUrl,
	/// Socket address the HTTP server binds.
	pub bind_addr: SocketAddr,
	/// Upper bound on each outbound token request.
	pub request_timeout: StdDuration,
}
impl RelayConfig {
	/// Creates a builder seeded with the production login host and default listener.
	pub fn builder() -> RelayConfigBuilder {
		RelayConfigBuilder::default()
	}
}

/// Builder for [`RelayConfig`] values.
#[derive(Clone)]
pub struct RelayConfigBuilder {
	/// Client identifier, required.
	pub client_id: Option<String>,
	/// Client secret, required.
	pub client_secret: Option<String>,
	/// Redirect URI, required.
	pub redirect_uri: Option<String>,
	/// Login host.
	pub login_url: String,
	/// Listening address.
	pub host: IpAddr,
	/// Listening port.
	pub port: u16,
	/// Outbound request bound.
	pub request_timeout: StdDuration,
}
impl Default for RelayConfigBuilder {
	fn default() -> Self {
		Self {
			client_id: None,
			client_secret: None,
			redirect_uri: None,
			login_url: PRODUCTION_LOGIN_URL.into(),
			host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
			port: DEFAULT_PORT,
			request_timeout: StdDuration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
		}
	}
}
impl RelayConfigBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, value: impl Into<String>) -> Self {
		self.client_secret = Some(value.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, value: impl Into<String>) -> Self {
		self.redirect_uri = Some(value.into());

		self
	}

	/// Overrides the login host.
	pub fn login_url(mut self, value: impl Into<String>) -> Self {
		self.login_url = value.into();

		self
	}

	/// Overrides the listening address.
	pub fn host(mut self, host: IpAddr) -> Self {
		self.host = host;

		self
	}

	/// Overrides the listening port.
	pub fn port(mut self, port: u16) -> Self {
		self.port = port;

		self
	}

	/// Overrides the outbound request bound.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<RelayConfig, ConfigError> {
		let client_id = required(CLIENT_ID_VAR, self.client_id)?;
		let client_secret = required(CLIENT_SECRET_VAR, self.client_secret)?;
		let redirect_uri = required(REDIRECT_URI_VAR, self.redirect_uri)?;
		let redirect_uri = RedirectUrl::new(redirect_uri)
			.map_err(|source| ConfigError::InvalidUrl { name: REDIRECT_URI_VAR, source })?;
		let login_url = Url::parse(self.login_url.trim())
			.map_err(|source| ConfigError::InvalidUrl { name: LOGIN_URL_VAR, source })?;

		validate_login_url(&login_url)?;

		let token_url = TokenUrl::new(format!(
			"{}{TOKEN_ENDPOINT_PATH}",
			login_url.as_str().trim_end_matches('/')
		))
		.map_err(|source| ConfigError::InvalidUrl { name: LOGIN_URL_VAR, source })?;

		if self.request_timeout.is_zero() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(RelayConfig {
			client_id: ClientId::new(client_id),
			client_secret: ClientSecret::new(client_secret),
			redirect_uri,
			login_url,
			token_url,
			bind_addr: SocketAddr::new(self.host, self.port),
			request_timeout: self.request_timeout,
		})
	}
}
impl Debug for RelayConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RelayConfigBuilder")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("login_url", &self.login_url)
			.field("host", &self.host)
			.field("port", &self.port)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value
		.map(|v| v.trim().to_owned())
		.filter(|v| !v.is_empty())
		.ok_or(ConfigError::MissingSetting { name })
}

fn validate_login_url(url: &Url) -> Result<(), ConfigError> {
	let loopback = match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	};

	match url.scheme() {
		"https" => Ok(()),
		"http" if loopback => Ok(()),
		_ => Err(ConfigError::InsecureLoginUrl { url: url.to_string() }),
	}
}
