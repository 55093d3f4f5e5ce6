// self
use crate::{_prelude::*, cache::CacheError, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"external_auth_client.operation",
				operation = kind.as_str(),
				stage
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a failed operation. `subject` names what the call was about (an email, a student).
///
/// Token checks log at `debug` because a `false` answer is an expected outcome.
pub fn log_operation_failure(kind: OperationKind, subject: Option<&str>, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		let label = kind.failure_label();
		let status = err.status_code();

		match (kind, subject) {
			(OperationKind::VerifyToken, _) =>
				tracing::debug!(operation = kind.as_str(), ?status, "{label}: {err}"),
			(_, Some(subject)) =>
				tracing::error!(operation = kind.as_str(), ?status, "{label} for {subject}: {err}"),
			(_, None) => tracing::error!(operation = kind.as_str(), ?status, "{label}: {err}"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, subject, err);
	}
}

/// Logs a required setting that the host did not provide.
pub fn log_missing_setting(message: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!("{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = message;
	}
}

/// Logs a cache backend failure; the caller carries on as if the cache were empty.
pub fn log_cache_failure(kind: OperationKind, action: &'static str, err: &CacheError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(operation = kind.as_str(), action, "Profile cache {action} failed: {err}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, action, err);
	}
}
