//! Client configuration supplied by the host application.

// self
use crate::{_prelude::*, cache::CacheKeyStrategy, error::ConfigError, secret::Secret};

/// Environment variable holding the remote API base URL.
pub const ENV_API_URL: &str = "EXTERNAL_API_URL";
/// Environment variable holding the application key sent on login.
pub const ENV_API_KEY: &str = "EXTERNAL_API_KEY";
/// Environment variable holding the request timeout in whole seconds.
pub const ENV_API_TIMEOUT: &str = "EXTERNAL_API_TIMEOUT";

/// Settings read once when the client is built.
///
/// Missing values are not an error here. The client logs a warning at construction and the
/// operations that need the value fail at call time instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL of the remote API, e.g. `https://api.example.com/api`.
	pub base_url: Option<String>,
	/// Application key sent as `app_key` on login.
	pub api_key: Option<Secret>,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Lifetime of cached profile responses.
	pub profile_ttl: Duration,
	/// How profile cache keys are derived from bearer tokens.
	pub cache_key_strategy: CacheKeyStrategy,
}
impl ClientConfig {
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);
	/// Default lifetime of cached profile responses.
	pub const DEFAULT_PROFILE_TTL: Duration = Duration::seconds(300);

	/// Creates a configuration with no URL, no key, and default durations.
	pub fn new() -> Self {
		Self {
			base_url: None,
			api_key: None,
			timeout: Self::DEFAULT_TIMEOUT,
			profile_ttl: Self::DEFAULT_PROFILE_TTL,
			cache_key_strategy: CacheKeyStrategy::default(),
		}
	}

	/// Loads settings from [`ENV_API_URL`], [`ENV_API_KEY`], and [`ENV_API_TIMEOUT`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads settings through an arbitrary key lookup, so hosts can plug in their own
	/// settings layer. Empty values count as absent.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read =
			|name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
		let mut config = Self::new();

		config.base_url = read(ENV_API_URL);
		config.api_key = read(ENV_API_KEY).map(Secret::from);

		if let Some(raw) = read(ENV_API_TIMEOUT) {
			let secs = raw
				.parse::<i64>()
				.ok()
				.filter(|secs| *secs > 0)
				.ok_or(ConfigError::InvalidTimeout { value: raw })?;

			config.timeout = Duration::seconds(secs);
		}

		Ok(config)
	}

	/// Sets the base URL. Empty strings leave it unset.
	pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into()).filter(|url| !url.is_empty());

		self
	}

	/// Sets the application key. Empty strings leave it unset.
	pub fn with_api_key(mut self, key: impl Into<Secret>) -> Self {
		self.api_key = Some(key.into()).filter(|key| !key.is_empty());

		self
	}

	/// Overrides the per-request timeout (non-positive values restore the default).
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = if timeout.is_positive() { timeout } else { Self::DEFAULT_TIMEOUT };

		self
	}

	/// Overrides the profile cache lifetime (non-positive values restore the default).
	pub fn with_profile_ttl(mut self, ttl: Duration) -> Self {
		self.profile_ttl = if ttl.is_positive() { ttl } else { Self::DEFAULT_PROFILE_TTL };

		self
	}

	/// Selects how profile cache keys are derived.
	pub fn with_cache_key_strategy(mut self, strategy: CacheKeyStrategy) -> Self {
		self.cache_key_strategy = strategy;

		self
	}

	/// Returns the timeout in the form transports expect.
	pub fn std_timeout(&self) -> std::time::Duration {
		self.timeout.unsigned_abs()
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
		move |name: &str| {
			pairs.iter().find(|(key, _)| *key == name).map(|(_, value)| value.to_string())
		}
	}

	#[test]
	fn defaults_match_documented_values() {
		let config = ClientConfig::default();

		assert_eq!(config.base_url, None);
		assert_eq!(config.api_key, None);
		assert_eq!(config.timeout, Duration::seconds(30));
		assert_eq!(config.profile_ttl, Duration::seconds(300));
		assert_eq!(config.cache_key_strategy, CacheKeyStrategy::TokenPrefix);
		assert_eq!(config.std_timeout(), std::time::Duration::from_secs(30));
	}

	#[test]
	fn lookup_reads_all_settings() {
		let config = ClientConfig::from_lookup(lookup(&[
			(ENV_API_URL, "https://api.example.com/"),
			(ENV_API_KEY, "key-1"),
			(ENV_API_TIMEOUT, " 12 "),
		]))
		.expect("Valid settings should load.");

		assert_eq!(config.base_url.as_deref(), Some("https://api.example.com/"));
		assert_eq!(config.api_key.as_ref().map(Secret::expose), Some("key-1"));
		assert_eq!(config.timeout, Duration::seconds(12));
	}

	#[test]
	fn lookup_treats_empty_values_as_absent() {
		let config = ClientConfig::from_lookup(lookup(&[(ENV_API_URL, ""), (ENV_API_KEY, "  ")]))
			.expect("Empty settings should load.");

		assert!(config.base_url.is_none());
		assert!(config.api_key.is_none());
		assert_eq!(config.timeout, ClientConfig::DEFAULT_TIMEOUT);
	}

	#[test]
	fn lookup_rejects_bad_timeouts() {
		for raw in ["abc", "0", "-5", "1.5"] {
			let err = ClientConfig::from_lookup(lookup(&[(ENV_API_TIMEOUT, raw)]))
				.expect_err("Invalid timeouts should be rejected.");

			assert!(matches!(err, ConfigError::InvalidTimeout { ref value } if value == raw));
		}
	}

	#[test]
	fn builders_ignore_empty_and_non_positive_values() {
		let config = ClientConfig::new()
			.with_base_url("")
			.with_api_key("")
			.with_timeout(Duration::ZERO)
			.with_profile_ttl(Duration::seconds(-1));

		assert_eq!(config, ClientConfig::default());

		let config = ClientConfig::new()
			.with_timeout(Duration::milliseconds(250))
			.with_cache_key_strategy(CacheKeyStrategy::TokenDigest);

		assert_eq!(config.std_timeout(), std::time::Duration::from_millis(250));
		assert_eq!(config.cache_key_strategy, CacheKeyStrategy::TokenDigest);
	}

	#[test]
	fn debug_output_redacts_api_key() {
		let config = ClientConfig::new().with_api_key("top-secret");

		assert!(!format!("{config:?}").contains("top-secret"));
	}
}
