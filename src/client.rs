//! The external API client: one transport step plus the domain operations built on it.
//!
//! [`ExternalAuthClient::send`] is the only place a request leaves the process. It joins the
//! base URL and path, injects the JSON and bearer headers, applies the configured timeout,
//! normalizes the body, and classifies the outcome into [`Error`]. The operations in
//! [`auth`] and [`student`] call it and convert every failure into a value at their boundary,
//! so hosts never see an `Err` from them.

pub mod auth;
pub mod student;

// self
use crate::{
	_prelude::*,
	cache::ResponseCache,
	config::ClientConfig,
	error::ConfigError,
	http::{
		ACCEPT, APPLICATION_JSON, AUTHORIZATION, ApiRequest, ApiTransport, CONTENT_TYPE,
		HttpMethod,
	},
	obs::{self, CacheMetrics, OperationKind, OperationOutcome, OperationSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAuthClient = ExternalAuthClient<ReqwestTransport>;

/// Client for the remote student API.
///
/// Cloning is cheap; clones share the transport, cache, metrics, and configuration. Build one
/// at application start and hand it to whatever needs it.
pub struct ExternalAuthClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Cache backing [`get_profile`](Self::get_profile).
	pub cache: Arc<dyn ResponseCache>,
	/// Hit/miss/write counters for the profile cache.
	pub cache_metrics: Arc<CacheMetrics>,
	config: Arc<ClientConfig>,
}
impl<T> ExternalAuthClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	///
	/// Missing base URL or API key only produce warnings here; calls that need them fail later.
	pub fn with_transport(
		config: ClientConfig,
		cache: Arc<dyn ResponseCache>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		if config.base_url.is_none() {
			obs::log_missing_setting(&ConfigError::MissingBaseUrl.to_string());
		}
		if config.api_key.is_none() {
			obs::log_missing_setting(&ConfigError::MissingApiKey.to_string());
		}

		Self {
			transport: transport.into(),
			cache,
			cache_metrics: Default::default(),
			config: Arc::new(config),
		}
	}

	/// Returns the configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Issues one request and returns the parsed body of a 2xx response.
	///
	/// Bodies that are not JSON come back as `{"raw": <text>}`. Non-2xx responses fail with
	/// [`Error::Remote`]; network faults fail with [`Error::Timeout`], [`Error::Connection`], or
	/// [`Error::Transport`]; a missing base URL fails with [`ConfigError::MissingBaseUrl`].
	pub async fn send(&self, call: ApiCall<'_>) -> Result<Value> {
		let request = self.build_request(call)?;
		let response = self.transport.execute(request).await?;

		if response.is_success() {
			Ok(response.into_json())
		} else {
			let status = response.status;

			Err(Error::remote(status, response.into_json()))
		}
	}

	/// Resolves `call` into the request handed to the transport.
	pub fn build_request(&self, call: ApiCall<'_>) -> Result<ApiRequest> {
		let base = self.config.base_url.as_deref().ok_or(ConfigError::MissingBaseUrl)?;
		let joined = join_url(base, &call.path);
		let mut url = Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidUrl { url: joined.clone(), source })?;

		if !call.query.is_empty() {
			url.query_pairs_mut().extend_pairs(call.query.iter());
		}

		let mut headers = vec![
			(CONTENT_TYPE, APPLICATION_JSON.to_owned()),
			(ACCEPT, APPLICATION_JSON.to_owned()),
		];

		if let Some(token) = call.token.filter(|token| !token.is_empty()) {
			headers.push((AUTHORIZATION, format!("Bearer {token}")));
		}

		Ok(ApiRequest {
			method: call.method,
			url,
			headers,
			body: call.body,
			timeout: self.config.std_timeout(),
		})
	}

	/// Runs one operation inside its span, records metrics, and logs the failure if any.
	async fn observe<O, Fut>(
		&self,
		kind: OperationKind,
		stage: &'static str,
		subject: Option<&str>,
		fut: Fut,
	) -> Result<O>
	where
		Fut: Future<Output = Result<O>>,
	{
		let span = OperationSpan::new(kind, stage);

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
			Err(err) => {
				obs::record_operation_outcome(kind, OperationOutcome::Failure);
				obs::log_operation_failure(kind, subject, err);
			},
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl ExternalAuthClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, cache: Arc<dyn ResponseCache>) -> Self {
		Self::with_transport(config, cache, ReqwestTransport::default())
	}
}
impl<T> Clone for ExternalAuthClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			cache: self.cache.clone(),
			cache_metrics: self.cache_metrics.clone(),
			config: self.config.clone(),
		}
	}
}
impl<T> Debug for ExternalAuthClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExternalAuthClient")
			.field("base_url", &self.config.base_url)
			.field("api_key_set", &self.config.api_key.is_some())
			.field("timeout", &self.config.timeout)
			.finish()
	}
}

/// One call to the remote API, as accepted by [`ExternalAuthClient::send`].
#[derive(Clone)]
pub struct ApiCall<'a> {
	method: HttpMethod,
	path: String,
	body: Option<Value>,
	token: Option<&'a str>,
	query: Vec<(String, String)>,
}
impl<'a> ApiCall<'a> {
	/// Creates a call with the given method and path (relative to the base URL).
	pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), body: None, token: None, query: Vec::new() }
	}

	/// Shorthand for a `GET` call.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(HttpMethod::Get, path)
	}

	/// Shorthand for a `POST` call.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(HttpMethod::Post, path)
	}

	/// Attaches a JSON body.
	pub fn with_body(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Attaches a bearer token. Empty tokens are not sent.
	pub fn with_token(mut self, token: &'a str) -> Self {
		self.token = Some(token);

		self
	}

	/// Appends a query parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}
}
impl Debug for ApiCall<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiCall")
			.field("method", &self.method)
			.field("path", &self.path)
			.field("body_set", &self.body.is_some())
			.field("token_set", &self.token.is_some())
			.field("query", &self.query)
			.finish()
	}
}

/// Joins `base` and `path` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
	format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
