//! Login and token lifecycle operations.
//!
//! [`ExternalAuthClient::authenticate`] exchanges student credentials plus the application key
//! for a bearer token. [`ExternalAuthClient::verify_token`] and
//! [`ExternalAuthClient::refresh_token`] check and renew that token. None of them return an
//! error: failures become [`AuthResult::Failed`], `false`, or `None` after being logged.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	client::{ApiCall, ExternalAuthClient},
	error::ConfigError,
	http::ApiTransport,
	model::{AuthResult, LoginResponse, RefreshResponse},
	obs::{self, OperationKind, OperationOutcome},
};

/// External login endpoint.
pub const LOGIN_PATH: &str = "/auth/external-login";
/// Current-session endpoint used to validate tokens.
pub const ME_PATH: &str = "/auth/me";
/// Token renewal endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

impl<T> ExternalAuthClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Authenticates a student against the remote API.
	///
	/// Without a configured API key this returns a failure immediately and makes no request.
	/// Failure logs carry the email, never the password.
	pub async fn authenticate(&self, email: &str, password: &str) -> AuthResult {
		const KIND: OperationKind = OperationKind::Authenticate;

		let Some(api_key) = self.config.api_key.as_ref() else {
			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
			obs::record_operation_outcome(KIND, OperationOutcome::Failure);

			return AuthResult::failed(ConfigError::MissingApiKey.to_string());
		};
		let login = self.login(email, password, api_key.expose());

		match self.observe(KIND, "authenticate", Some(email), login).await {
			Ok(response) => AuthResult::Authenticated {
				expires_in: response.expires_in(),
				student: response.student,
				token: response.token,
			},
			Err(err) => AuthResult::failed(err.message()),
		}
	}

	/// Returns `true` iff the remote API accepts `token`.
	///
	/// Every failure (network, timeout, non-2xx, missing configuration) reads as `false`.
	pub async fn verify_token(&self, token: &str) -> bool {
		self.observe(
			OperationKind::VerifyToken,
			"verify_token",
			None,
			self.send(ApiCall::get(ME_PATH).with_token(token)),
		)
		.await
		.is_ok()
	}

	/// Exchanges `token` for a fresh one.
	///
	/// Returns `None` when the call fails (the failure is logged) or when a successful
	/// response carries no `token` field.
	pub async fn refresh_token(&self, token: &str) -> Option<String> {
		let refresh = self.request_refresh(token);

		self.observe(OperationKind::RefreshToken, "refresh_token", None, refresh)
			.await
			.ok()
			.flatten()
	}

	async fn login(&self, email: &str, password: &str, api_key: &str) -> Result<LoginResponse> {
		let body = json!({ "email": email, "password": password, "app_key": api_key });
		let value = self.send(ApiCall::post(LOGIN_PATH).with_body(body)).await?;

		Ok(serde_path_to_error::deserialize(value)?)
	}

	async fn request_refresh(&self, token: &str) -> Result<Option<String>> {
		let value = self.send(ApiCall::post(REFRESH_PATH).with_token(token)).await?;
		let response: RefreshResponse = serde_path_to_error::deserialize(value)?;

		Ok(response.token)
	}
}
