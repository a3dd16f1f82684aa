// self
use crate::{
	_prelude::*,
	error::ValidationError,
	grant::{AuthorizationCodeRequest, GrantType, TokenForm, TokenSet},
	http::TokenHttpClient,
	obs::{self, GrantOutcome, GrantSpan},
	relay::TokenRelay,
};

impl<C> TokenRelay<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Exchanges an authorization code for the provider's token set.
	///
	/// A missing or empty code fails with [`ValidationError::MissingAuthorizationCode`] before any
	/// outbound call. Provider fields are returned verbatim; fields the provider omits stay absent.
	pub async fn exchange_authorization_code(
		&self,
		request: AuthorizationCodeRequest,
	) -> Result<TokenSet> {
		const GRANT: GrantType = GrantType::AuthorizationCode;

		let span = GrantSpan::new(GRANT, "exchange_authorization_code");

		obs::record_grant_outcome(GRANT, GrantOutcome::Attempt);

		let result = span
			.instrument(async move {
				let code = request.authorization_code().ok_or_else(|| {
					tracing::warn!("Rejected code exchange without an authorization code.");

					ValidationError::missing_input(GRANT)
				})?;
				let form = TokenForm::authorization_code(&self.config, &code);

				self.request_token(form).await
			})
			.await;

		obs::record_grant_outcome(GRANT, GrantOutcome::of(&result));

		result
	}
}
