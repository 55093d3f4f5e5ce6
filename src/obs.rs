//! Observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit spans named `external_auth_client.operation` with
//!   the `operation` and `stage` fields, plus the warning and failure logs of each operation.
//! - Enable `metrics` to increment the `external_auth_client_operation_total` counter for every
//!   attempt/success/failure/cache hit, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Domain operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// External login.
	Authenticate,
	/// Cached profile lookup.
	Profile,
	/// Formation listing.
	Formations,
	/// Schedule listing.
	Schedule,
	/// Token validity check.
	VerifyToken,
	/// Token renewal.
	RefreshToken,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "authenticate",
			OperationKind::Profile => "profile",
			OperationKind::Formations => "formations",
			OperationKind::Schedule => "schedule",
			OperationKind::VerifyToken => "verify_token",
			OperationKind::RefreshToken => "refresh_token",
		}
	}

	/// Returns the human-readable prefix used in failure logs.
	pub const fn failure_label(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "Authentication failed",
			OperationKind::Profile => "Failed to get student profile",
			OperationKind::Formations => "Failed to get formations",
			OperationKind::Schedule => "Failed to get schedule",
			OperationKind::VerifyToken => "Token verification failed",
			OperationKind::RefreshToken => "Failed to refresh token",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion from the network.
	Success,
	/// Successful completion served from the cache.
	CacheHit,
	/// Failure converted into a result value.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::CacheHit => "cache_hit",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
