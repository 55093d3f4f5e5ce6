//! Transport primitives for calls to the remote API.
//!
//! [`ApiTransport`] is the client's only dependency on an HTTP stack. The client builds a fully
//! resolved [`ApiRequest`] (URL, headers, JSON body, timeout) and the transport returns the raw
//! status and body as a [`RawResponse`]. Status classification and JSON normalization stay in
//! the client so every transport behaves the same way.
//!
//! Transports report network faults with the matching [`Error`] variant:
//! [`Error::Timeout`] when the deadline passes, [`Error::Connection`] when the host cannot be
//! reached, and [`Error::transport`] for anything else.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<RawResponse>> + 'a + Send>>;

/// HTTP stack able to execute one JSON request with a timeout.
///
/// Implementations must be `Send + Sync + 'static` so a client can be shared across tasks.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` once. Non-2xx statuses are returned as responses, not errors.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP methods supported by the remote API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the upper-case method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to an [`ApiTransport`].
#[derive(Clone)]
pub struct ApiRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute URL including query parameters.
	pub url: Url,
	/// Header name/value pairs, applied in order.
	pub headers: Vec<(&'static str, String)>,
	/// JSON body, if any.
	pub body: Option<Value>,
	/// Deadline for the whole exchange.
	pub timeout: std::time::Duration,
}
impl ApiRequest {
	/// Returns the value of the first header matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(key, value)| {
				let shown = if key.eq_ignore_ascii_case(AUTHORIZATION) {
					"<redacted>"
				} else {
					value.as_str()
				};

				(*key, shown)
			})
			.collect::<Vec<_>>();

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_set", &self.body.is_some())
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Status and undecoded body returned by an [`ApiTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Parses the body as JSON, falling back to `{"raw": <text>}` when it is not JSON.
	pub fn into_json(self) -> Value {
		match serde_json::from_slice(&self.body) {
			Ok(value) => value,
			Err(_) => serde_json::json!({ "raw": String::from_utf8_lossy(&self.body) }),
		}
	}
}

/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Accept` header name.
pub const ACCEPT: &str = "Accept";
/// `Authorization` header name.
pub const AUTHORIZATION: &str = "Authorization";
/// Media type used for every request and expected for every response.
pub const APPLICATION_JSON: &str = "application/json";

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a transport from a configured reqwest builder (proxies, TLS roots, pools).
	pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self, ConfigError> {
		builder.build().map(Self).map_err(ConfigError::http_client_build)
	}

	async fn execute_now(client: ReqwestClient, request: ApiRequest) -> Result<RawResponse> {
		let method = match request.method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
			HttpMethod::Put => reqwest::Method::PUT,
			HttpMethod::Patch => reqwest::Method::PATCH,
			HttpMethod::Delete => reqwest::Method::DELETE,
		};
		let mut builder = client.request(method, request.url).timeout(request.timeout);

		for (name, value) in request.headers {
			builder = builder.header(name, value);
		}
		if let Some(body) = request.body {
			builder = builder.body(serde_json::to_vec(&body).map_err(Error::transport)?);
		}

		let response = builder.send().await?;
		let status = response.status().as_u16();
		let body = response.bytes().await?.to_vec();

		Ok(RawResponse { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(Self::execute_now(self.0.clone(), request))
	}
}
