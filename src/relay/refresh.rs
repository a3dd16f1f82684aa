// self
use crate::{
	_prelude::*,
	error::ValidationError,
	grant::{GrantType, RefreshTokenRequest, RefreshedTokenSet, TokenForm},
	http::TokenHttpClient,
	obs::{self, GrantOutcome, GrantSpan},
	relay::TokenRelay,
};

impl<C> TokenRelay<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Trades a refresh token for a fresh access token.
	///
	/// The returned set never includes a refresh token, even when the provider rotates it.
	pub async fn refresh_access_token(
		&self,
		request: RefreshTokenRequest,
	) -> Result<RefreshedTokenSet> {
		const GRANT: GrantType = GrantType::RefreshToken;

		let span = GrantSpan::new(GRANT, "refresh_access_token");

		obs::record_grant_outcome(GRANT, GrantOutcome::Attempt);

		let result = span
			.instrument(async move {
				let refresh_token = request.refresh_token().ok_or_else(|| {
					tracing::warn!("Rejected refresh without a refresh token.");

					ValidationError::missing_input(GRANT)
				})?;
				let form = TokenForm::refresh_token(&self.config, &refresh_token);

				self.request_token(form).await.map(RefreshedTokenSet::from)
			})
			.await;

		obs::record_grant_outcome(GRANT, GrantOutcome::of(&result));

		result
	}
}
