#![cfg(all(feature = "reqwest", feature = "metrics"))]

mod common;

// std
use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
};
// crates.io
use httpmock::prelude::*;
use metrics::{
	Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};
use parking_lot::Mutex;
use serde_json::json;
// self
use common::TOKEN;
use external_auth_client::config::ClientConfig;

#[derive(Default)]
struct OutcomeCount(AtomicU64);
impl CounterFn for OutcomeCount {
	fn increment(&self, value: u64) {
		self.0.fetch_add(value, Ordering::Relaxed);
	}

	fn absolute(&self, value: u64) {
		self.0.store(value, Ordering::Relaxed);
	}
}

/// Keeps every counter keyed by its `operation/outcome` labels.
#[derive(Default)]
struct OutcomeRecorder {
	counters: Mutex<HashMap<String, Arc<OutcomeCount>>>,
}
impl OutcomeRecorder {
	fn count(&self, operation: &str, outcome: &str) -> u64 {
		self.counters
			.lock()
			.get(&format!("{operation}/{outcome}"))
			.map(|count| count.0.load(Ordering::Relaxed))
			.unwrap_or_default()
	}
}
impl Recorder for OutcomeRecorder {
	fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

	fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

	fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

	fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
		assert_eq!(key.name(), "external_auth_client_operation_total");

		let label = |name: &str| {
			key.labels()
				.find(|label| label.key() == name)
				.map(|label| label.value().to_owned())
				.unwrap_or_default()
		};
		let slot = format!("{}/{}", label("operation"), label("outcome"));
		let count = self.counters.lock().entry(slot).or_default().clone();

		Counter::from_arc(count)
	}

	fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
		Gauge::noop()
	}

	fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
		Histogram::noop()
	}
}

#[tokio::test]
async fn failed_logins_record_their_attempts() {
	let recorder = OutcomeRecorder::default();
	let _guard = metrics::set_default_local_recorder(&recorder);
	let (keyless, _clock) =
		common::build_client_with(ClientConfig::new().with_base_url("http://127.0.0.1:1"));

	assert!(!keyless.authenticate("a@b.com", "pw").await.is_success());
	assert_eq!(recorder.count("authenticate", "attempt"), 1);
	assert_eq!(recorder.count("authenticate", "failure"), 1);

	assert!(!common::unreachable_client().authenticate("a@b.com", "pw").await.is_success());
	assert_eq!(recorder.count("authenticate", "attempt"), 2);
	assert_eq!(recorder.count("authenticate", "failure"), 2);
	assert_eq!(recorder.count("authenticate", "success"), 0);
}

#[tokio::test]
async fn cached_profiles_record_a_cache_hit() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/students/me/profile");
			then.status(200).json_body(json!({ "id": 42 }));
		})
		.await;

	let recorder = OutcomeRecorder::default();
	let _guard = metrics::set_default_local_recorder(&recorder);
	let (client, _clock) = common::build_client(&server);

	client.get_profile(TOKEN).await;
	client.get_profile(TOKEN).await;

	assert_eq!(recorder.count("profile", "attempt"), 2);
	assert_eq!(recorder.count("profile", "success"), 2);
	assert_eq!(recorder.count("profile", "cache_hit"), 1);
	assert_eq!(recorder.count("profile", "failure"), 0);
}
