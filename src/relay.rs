//! Token relay that trades caller-supplied grant inputs for provider-issued tokens.
//!
//! [`TokenRelay`] owns the process-wide [`RelayConfig`] and a shared [`TokenHttpClient`]. Each
//! operation validates its input locally, posts one urlencoded form to the configured token
//! endpoint, and relays the provider's answer without caching anything.

mod exchange;
mod refresh;

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	config::RelayConfig,
	error::{ProviderError, TransportError},
	grant::{GrantType, ProviderErrorPayload, TokenForm, TokenSet, payload},
	http::{ReqwestHttpClient, ResponseMetadataSlot, TokenHttpClient},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Relays authorization-code and refresh grants to a single token endpoint.
pub struct TokenRelay<C = ReqwestHttpClient>
where
	C: ?Sized + TokenHttpClient,
{
	/// Immutable configuration shared by every request.
	pub config: Arc<RelayConfig>,
	/// HTTP client used for every outbound token request.
	pub http_client: Arc<C>,
}
impl<C> TokenRelay<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a relay that reuses the caller-provided transport.
	pub fn with_http_client(config: Arc<RelayConfig>, http_client: impl Into<Arc<C>>) -> Self {
		Self { config, http_client: http_client.into() }
	}

	async fn request_token(&self, form: TokenForm) -> Result<TokenSet> {
		let grant = form.grant();
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.config.token_url.as_str())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, JSON_CONTENT_TYPE)
			.body(form.encode().into_bytes())
			.map_err(TransportError::from)?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let response = handle.call(request).await.map_err(|err| {
			let err = self.http_client.map_transport_error(err);
			// Set when the status line arrived before the failure.
			let status = slot.take().and_then(|meta| meta.status);

			tracing::error!(
				grant = grant.as_str(),
				status = ?status,
				error = %err,
				"Token request failed in transit."
			);

			err
		})?;
		let status = response.status();
		let meta = slot.take().unwrap_or_default();

		if status.is_success() {
			return payload::parse_json::<TokenSet>(response.body(), status.as_u16())
				.inspect(|_| {
					tracing::info!(grant = grant.as_str(), "Token endpoint issued tokens.");
				})
				.map_err(|err| log_malformed(grant, err).into());
		}

		let body = payload::parse_json::<ProviderErrorPayload>(response.body(), status.as_u16())
			.map_err(|err| log_malformed(grant, err))?;
		let err = ProviderError {
			grant,
			status: status.as_u16(),
			error: body.error,
			description: body.error_description,
			retry_after: meta.retry_after,
		};

		tracing::warn!(
			grant = grant.as_str(),
			status = err.status,
			error = %err.error_code(),
			retry_after_secs = ?err.retry_after_secs(),
			"Token endpoint rejected the grant."
		);

		Err(err.into())
	}
}
impl TokenRelay<ReqwestHttpClient> {
	/// Creates a relay backed by a reqwest client honoring the configured request timeout.
	pub fn new(config: Arc<RelayConfig>) -> Result<Self> {
		let http_client = ReqwestHttpClient::new(config.request_timeout)?;

		Ok(Self::with_http_client(config, http_client))
	}
}
impl<C> Clone for TokenRelay<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self { config: Arc::clone(&self.config), http_client: Arc::clone(&self.http_client) }
	}
}
impl<C> Debug for TokenRelay<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRelay")
			.field("client_id", &self.config.client_id.as_str())
			.field("token_url", &self.config.token_url.as_str())
			.finish()
	}
}

fn log_malformed(grant: GrantType, err: TransportError) -> TransportError {
	tracing::error!(
		grant = grant.as_str(),
		error = %err,
		"Token endpoint returned an unreadable body."
	);

	err
}

#[cfg(test)]
pub(crate) mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use oauth2::{HttpClientError, HttpRequest, HttpResponse, http::StatusCode};
	// self
	use super::*;
	use crate::http::ResponseMetadata;

	#[derive(Debug)]
	pub(crate) struct Unreachable;
	impl Display for Unreachable {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("connection refused")
		}
	}
	impl StdError for Unreachable {}

	#[derive(Clone, Debug)]
	pub(crate) enum Canned {
		Respond(u16, &'static str),
		Unreachable,
	}

	/// Fake transport that answers every request with a canned response.
	#[derive(Debug)]
	pub(crate) struct FakeHttpClient {
		canned: Canned,
		calls: Arc<AtomicUsize>,
		last_body: Arc<Mutex<Option<String>>>,
	}
	impl FakeHttpClient {
		pub(crate) fn new(canned: Canned) -> Self {
			Self { canned, calls: Default::default(), last_body: Default::default() }
		}

		pub(crate) fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}

		pub(crate) fn last_body(&self) -> Option<String> {
			self.last_body.lock().clone()
		}
	}
	impl TokenHttpClient for FakeHttpClient {
		type Handle = FakeHandle;
		type TransportError = Unreachable;

		fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
			FakeHandle {
				canned: self.canned.clone(),
				calls: Arc::clone(&self.calls),
				last_body: Arc::clone(&self.last_body),
				slot,
			}
		}
	}

	pub(crate) struct FakeHandle {
		canned: Canned,
		calls: Arc<AtomicUsize>,
		last_body: Arc<Mutex<Option<String>>>,
		slot: ResponseMetadataSlot,
	}
	impl<'c> AsyncHttpClient<'c> for FakeHandle {
		type Error = HttpClientError<Unreachable>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, request: HttpRequest) -> Self::Future {
			Box::pin(async move {
				self.slot.take();
				self.calls.fetch_add(1, Ordering::SeqCst);
				*self.last_body.lock() = Some(String::from_utf8_lossy(request.body()).into_owned());

				match &self.canned {
					Canned::Respond(status, body) => {
						let status = StatusCode::from_u16(*status)
							.expect("Canned status code should be valid.");
						let mut response = HttpResponse::new(body.as_bytes().to_vec());

						*response.status_mut() = status;

						self.slot.store(ResponseMetadata {
							status: Some(status.as_u16()),
							retry_after: None,
						});

						Ok(response)
					},
					Canned::Unreachable => Err(HttpClientError::Reqwest(Box::new(Unreachable))),
				}
			})
		}
	}

	pub(crate) fn config() -> Arc<RelayConfig> {
		Arc::new(
			RelayConfig::builder()
				.client_id("client-unit")
				.client_secret("secret-unit")
				.redirect_uri("https://app.example.com/callback")
				.build()
				.expect("Unit test configuration should be valid."),
		)
	}

	pub(crate) fn relay(canned: Canned) -> (TokenRelay<FakeHttpClient>, Arc<FakeHttpClient>) {
		let client = Arc::new(FakeHttpClient::new(canned));

		(TokenRelay::with_http_client(config(), Arc::clone(&client)), client)
	}

	#[test]
	fn debug_output_omits_client_secret() {
		let (relay, _) = relay(Canned::Unreachable);
		let rendered = format!("{relay:?}");

		assert!(rendered.contains("client-unit"));
		assert!(rendered.contains("/services/oauth2/token"));
		assert!(!rendered.contains("secret-unit"));
	}

	#[tokio::test]
	async fn non_json_error_body_surfaces_as_transport_error() {
		let (relay, client) = relay(Canned::Respond(502, "<html>Bad Gateway</html>"));
		let form = TokenForm::refresh_token(&relay.config, &oauth2::RefreshToken::new("RT".into()));
		let err = relay.request_token(form).await.expect_err("HTML body should be rejected.");

		assert!(matches!(
			err,
			Error::Transport(TransportError::MalformedResponse { status: 502, .. })
		));
		assert_eq!(client.calls(), 1);
	}
}
