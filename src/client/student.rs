//! Student data operations: the cached profile plus formation and schedule listings.

// self
use crate::{
	_prelude::*,
	cache::CacheKey,
	client::{ApiCall, ExternalAuthClient},
	http::ApiTransport,
	model::{ApiPayload, FailurePayload, Placeholder},
	obs::{self, OperationKind, OperationOutcome},
};

/// Profile endpoint for the token's owner.
pub const PROFILE_PATH: &str = "/students/me/profile";

impl<T> ExternalAuthClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Returns the profile of the student owning `token`.
	///
	/// A live cache entry is returned as-is without contacting the remote API, even if the
	/// upstream value has since changed. Fresh responses are cached for the configured TTL;
	/// failures are never cached.
	pub async fn get_profile(&self, token: &str) -> ApiPayload {
		let fetch = self.fetch_profile(token);

		match self.observe(OperationKind::Profile, "get_profile", None, fetch).await {
			Ok(value) => ApiPayload::Data(value),
			Err(err) => ApiPayload::Failure(FailurePayload::new(err.message())),
		}
	}

	/// Returns the formations of `student_id`, or a failure carrying `formations: []`.
	pub async fn get_formations(&self, student_id: u64, token: &str) -> ApiPayload {
		let kind = OperationKind::Formations;

		self.fetch_student_list(kind, student_id, token, Placeholder::Formations).await
	}

	/// Returns the schedule of `student_id`, or a failure carrying `schedule: []`.
	pub async fn get_schedule(&self, student_id: u64, token: &str) -> ApiPayload {
		let kind = OperationKind::Schedule;

		self.fetch_student_list(kind, student_id, token, Placeholder::Schedule).await
	}

	async fn fetch_profile(&self, token: &str) -> Result<Value> {
		const KIND: OperationKind = OperationKind::Profile;

		let key = CacheKey::for_profile(token, self.config.cache_key_strategy);

		match self.cache.get(&key).await {
			Ok(Some(value)) => {
				self.cache_metrics.record_hit();
				obs::record_operation_outcome(KIND, OperationOutcome::CacheHit);

				return Ok(value);
			},
			Ok(None) => {},
			Err(err) => obs::log_cache_failure(KIND, "read", &err),
		}

		self.cache_metrics.record_miss();

		let value = self.send(ApiCall::get(PROFILE_PATH).with_token(token)).await?;

		match self.cache.set(key, value.clone(), self.config.profile_ttl).await {
			Ok(()) => self.cache_metrics.record_write(),
			Err(err) => obs::log_cache_failure(KIND, "write", &err),
		}

		Ok(value)
	}

	async fn fetch_student_list(
		&self,
		kind: OperationKind,
		student_id: u64,
		token: &str,
		placeholder: Placeholder,
	) -> ApiPayload {
		let path = format!("/students/{student_id}/{}", placeholder.field());
		let subject = format!("student {student_id}");
		let call = self.send(ApiCall::get(path).with_token(token));

		match self.observe(kind, placeholder.field(), Some(&subject), call).await {
			Ok(value) => ApiPayload::Data(value),
			Err(err) => {
				let failure = FailurePayload::new(err.message()).with_placeholder(placeholder);

				ApiPayload::Failure(failure)
			},
		}
	}
}
