#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
use time::{Duration, macros};
// self
use external_auth_client::{
	cache::{ManualClock, MemoryCache},
	client::ReqwestAuthClient,
	config::ClientConfig,
};

pub const API_KEY: &str = "app-key-fixture";
pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.student-42.signature";

/// Client wired to `server` with an API key, a fresh memory cache, and a manual clock.
pub fn build_client(server: &MockServer) -> (ReqwestAuthClient, ManualClock) {
	build_client_with(ClientConfig::new().with_base_url(server.base_url()).with_api_key(API_KEY))
}

/// Client built from `config` with a fresh memory cache driven by a manual clock.
pub fn build_client_with(config: ClientConfig) -> (ReqwestAuthClient, ManualClock) {
	let clock = ManualClock::new(macros::datetime!(2025-11-10 12:00 UTC));
	let cache = MemoryCache::with_clock(std::sync::Arc::new(clock.clone()));
	let client = ReqwestAuthClient::new(config, std::sync::Arc::new(cache));

	(client, clock)
}

/// Client pointing at a local port nothing listens on.
pub fn unreachable_client() -> ReqwestAuthClient {
	let config = ClientConfig::new()
		.with_base_url("http://127.0.0.1:1")
		.with_api_key(API_KEY)
		.with_timeout(Duration::seconds(5));

	build_client_with(config).0
}
