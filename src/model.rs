//! Result shapes returned by the domain operations and the wire payloads they exchange.
//!
//! Operation results serialize to the flat dictionaries the host's templates and JSON views
//! expect: `{"success": true, ...}` on success and `{"success": false, "error": ...}` on
//! failure, plus an empty list placeholder for the list-returning operations.

// crates.io
use serde::ser::{SerializeMap, Serializer};
// self
use crate::_prelude::*;

/// Default lifetime reported when the login response omits `expiresIn`.
pub const DEFAULT_EXPIRES_IN: &str = "24h";

/// Outcome of [`authenticate`](crate::client::ExternalAuthClient::authenticate).
///
/// Success and failure fields never mix.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthResult {
	/// Credentials were accepted.
	Authenticated {
		/// Student record returned by the remote API.
		student: Option<Value>,
		/// Bearer token for subsequent calls.
		token: Option<String>,
		/// Token lifetime as reported upstream, e.g. `24h`.
		expires_in: String,
	},
	/// Authentication could not be completed.
	Failed {
		/// Caller-facing failure message.
		error: String,
	},
}
impl AuthResult {
	/// Builds a failed result.
	pub fn failed(error: impl Into<String>) -> Self {
		Self::Failed { error: error.into() }
	}

	/// Returns `true` for [`AuthResult::Authenticated`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Authenticated { .. })
	}

	/// Returns the bearer token on success.
	pub fn token(&self) -> Option<&str> {
		match self {
			Self::Authenticated { token, .. } => token.as_deref(),
			Self::Failed { .. } => None,
		}
	}

	/// Returns the student record on success.
	pub fn student(&self) -> Option<&Value> {
		match self {
			Self::Authenticated { student, .. } => student.as_ref(),
			Self::Failed { .. } => None,
		}
	}

	/// Returns the failure message.
	pub fn error(&self) -> Option<&str> {
		match self {
			Self::Authenticated { .. } => None,
			Self::Failed { error } => Some(error),
		}
	}
}
impl Serialize for AuthResult {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			Self::Authenticated { student, token, expires_in } => {
				let mut map = serializer.serialize_map(Some(4))?;

				map.serialize_entry("success", &true)?;
				map.serialize_entry("student", student)?;
				map.serialize_entry("token", token)?;
				map.serialize_entry("expires_in", expires_in)?;
				map.end()
			},
			Self::Failed { error } => {
				let mut map = serializer.serialize_map(Some(2))?;

				map.serialize_entry("success", &false)?;
				map.serialize_entry("error", error)?;
				map.end()
			},
		}
	}
}

/// Empty list attached to a failure so callers can iterate without null checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placeholder {
	/// Adds `formations: []`.
	Formations,
	/// Adds `schedule: []`.
	Schedule,
}
impl Placeholder {
	/// Returns the field name carrying the empty list.
	pub const fn field(self) -> &'static str {
		match self {
			Placeholder::Formations => "formations",
			Placeholder::Schedule => "schedule",
		}
	}
}

/// Uniform failure value returned by the data operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailurePayload {
	/// Caller-facing failure message.
	pub error: String,
	/// Empty list field to include, if any.
	pub placeholder: Option<Placeholder>,
}
impl FailurePayload {
	/// Creates a failure without a list placeholder.
	pub fn new(error: impl Into<String>) -> Self {
		Self { error: error.into(), placeholder: None }
	}

	/// Attaches an empty list placeholder.
	pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
		self.placeholder = Some(placeholder);

		self
	}

	/// Returns the placeholder list, which is always empty.
	pub fn items(&self) -> &[Value] {
		&[]
	}
}
impl Serialize for FailurePayload {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let len = if self.placeholder.is_some() { 3 } else { 2 };
		let mut map = serializer.serialize_map(Some(len))?;

		map.serialize_entry("success", &false)?;
		map.serialize_entry("error", &self.error)?;

		if let Some(placeholder) = self.placeholder {
			map.serialize_entry(placeholder.field(), self.items())?;
		}

		map.end()
	}
}

/// Result of a data operation: the remote payload as-is, or a uniform failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiPayload {
	/// Successful response body, unmodified.
	Data(Value),
	/// Failure converted at the operation boundary.
	Failure(FailurePayload),
}
impl ApiPayload {
	/// Returns `true` for [`ApiPayload::Data`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Data(_))
	}

	/// Returns the response body on success.
	pub fn data(&self) -> Option<&Value> {
		match self {
			Self::Data(value) => Some(value),
			Self::Failure(_) => None,
		}
	}

	/// Returns the failure on error.
	pub fn failure(&self) -> Option<&FailurePayload> {
		match self {
			Self::Data(_) => None,
			Self::Failure(failure) => Some(failure),
		}
	}

	/// Converts into a JSON value in the flat dictionary shape.
	pub fn into_value(self) -> Value {
		match self {
			Self::Data(value) => value,
			Self::Failure(failure) => serde_json::to_value(failure).unwrap_or(Value::Null),
		}
	}
}

/// Fields read from a successful login response; everything else is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
	#[serde(default)]
	pub student: Option<Value>,
	#[serde(default)]
	pub token: Option<String>,
	#[serde(default, rename = "expiresIn")]
	pub expires_in: Option<Value>,
}
impl LoginResponse {
	/// Renders `expiresIn` as reported upstream; numbers such as `86400` keep their digits.
	pub fn expires_in(&self) -> String {
		match &self.expires_in {
			Some(Value::String(lifetime)) => lifetime.clone(),
			Some(Value::Null) | None => DEFAULT_EXPIRES_IN.to_owned(),
			Some(other) => other.to_string(),
		}
	}
}

/// Fields read from a successful refresh response.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
	#[serde(default)]
	pub token: Option<String>,
}
