//! Client-level error types shared by the transport step and the domain operations.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error raised by [`send`](crate::client::ExternalAuthClient::send).
///
/// The `Display` output of every variant is the human-readable message the domain operations
/// hand back to callers, so it must stay free of secrets and stack details.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; the host must fix its settings.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Remote API did not answer within the configured timeout.
	#[error("Request timeout - API server not responding")]
	Timeout,
	/// Remote API could not be reached at all.
	#[error("Connection error - Cannot reach API server")]
	Connection,
	/// Remote API answered with a non-2xx status.
	#[error("{message}")]
	Remote {
		/// Upstream `error` field, or `HTTP <status>` when absent.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Normalized response body.
		body: Value,
	},
	/// Any other transport fault.
	#[error("Request failed: {source}")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// A successful response did not match the expected shape.
	#[error("Response body has an unexpected shape: {source}")]
	Decode {
		/// Structured decoding failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Wraps a transport-specific failure.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Builds a [`Error::Remote`] from an HTTP status and the normalized body.
	pub fn remote(status: u16, body: Value) -> Self {
		let message = match body.get("error") {
			Some(Value::String(message)) => message.clone(),
			Some(Value::Null) | None => format!("HTTP {status}"),
			Some(other) => other.to_string(),
		};

		Self::Remote { message, status, body }
	}

	/// Returns the caller-facing message.
	pub fn message(&self) -> String {
		self.to_string()
	}

	/// Returns the HTTP status code for remote failures.
	pub fn status_code(&self) -> Option<u16> {
		match self {
			Self::Remote { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns the normalized response body for remote failures.
	pub fn response_body(&self) -> Option<&Value> {
		match self {
			Self::Remote { body, .. } => Some(body),
			_ => None,
		}
	}

	/// Returns `true` when retrying the same request later may succeed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Timeout | Self::Connection)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout
		} else if e.is_connect() {
			Self::Connection
		} else {
			Self::transport(e)
		}
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::Decode { source: e }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No base URL was supplied.
	#[error("API URL not configured")]
	MissingBaseUrl,
	/// No API key was supplied.
	#[error("API key not configured")]
	MissingApiKey,
	/// Base URL joined with the endpoint path does not parse.
	#[error("API URL `{url}` is invalid.")]
	InvalidUrl {
		/// The joined URL that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Timeout setting is not a positive number of seconds.
	#[error("API timeout `{value}` is not a positive number of seconds.")]
	InvalidTimeout {
		/// Raw setting value.
		value: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
