//! Cache contracts and the built-in in-memory cache for hot API responses.

pub mod clock;
pub mod memory;

pub use clock::*;
pub use memory::MemoryCache;

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Boxed future returned by [`ResponseCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Key/value store with per-entry expiry, shared by every client in the process.
///
/// Implementations must make `get` and `set` atomic per key. No ordering across keys is
/// required because entries are independent.
pub trait ResponseCache
where
	Self: Send + Sync,
{
	/// Returns the live value stored under `key`, or `None` when absent or expired.
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<Value>>;

	/// Stores `value` under `key` for `ttl`, replacing any previous entry.
	fn set(&self, key: CacheKey, value: Value, ttl: Duration) -> CacheFuture<'_, ()>;
}

/// Error type produced by [`ResponseCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CacheError {
	/// Value could not be encoded or decoded by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the cache engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// How a bearer token is reduced to a cache key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CacheKeyStrategy {
	/// First [`CacheKey::TOKEN_PREFIX_LEN`] characters of the token.
	///
	/// Distinct tokens sharing that prefix share a cache entry.
	#[default]
	TokenPrefix,
	/// Hex SHA-256 digest of the whole token.
	TokenDigest,
}

/// Key under which a response is cached.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);
impl CacheKey {
	/// Number of token characters kept by [`CacheKeyStrategy::TokenPrefix`].
	pub const TOKEN_PREFIX_LEN: usize = 20;

	const PROFILE_NAMESPACE: &'static str = "profile_";

	/// Wraps an arbitrary key.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Derives the profile cache key for `token`.
	pub fn for_profile(token: &str, strategy: CacheKeyStrategy) -> Self {
		let suffix = match strategy {
			CacheKeyStrategy::TokenPrefix => token.chars().take(Self::TOKEN_PREFIX_LEN).collect(),
			CacheKeyStrategy::TokenDigest => hex_digest(token),
		};

		Self(format!("{}{suffix}", Self::PROFILE_NAMESPACE))
	}

	/// Returns the key as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CacheKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn hex_digest(token: &str) -> String {
	let digest = Sha256::digest(token.as_bytes());
	let mut buf = String::with_capacity(digest.len() * 2);

	for byte in digest {
		buf.push_str(&format!("{byte:02x}"));
	}

	buf
}
