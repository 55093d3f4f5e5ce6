//! Demonstrates logging a student in with the default reqwest transport and reusing the cached
//! profile on the second lookup.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use external_auth_client::{
	cache::{MemoryCache, ResponseCache},
	client::ReqwestAuthClient,
	config::ClientConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/external-login");
			then.status(200).json_body(json!({
				"student": { "id": 42, "name": "Ada" },
				"token": "demo-student-token",
				"expiresIn": "12h"
			}));
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/students/me/profile")
				.header("authorization", "Bearer demo-student-token");
			then.status(200).json_body(json!({ "id": 42, "name": "Ada", "level": "L3" }));
		})
		.await;
	// Settings come from `EXTERNAL_API_*` when present; the mock server fills the gaps.
	let config = ClientConfig::from_env()?;
	let config = if config.base_url.is_some() {
		config
	} else {
		config.with_base_url(server.base_url()).with_api_key("demo-app-key")
	};
	let cache: Arc<dyn ResponseCache> = Arc::new(MemoryCache::new());
	let client = ReqwestAuthClient::new(config, cache);
	let login = client.authenticate("ada@school.test", "correct horse").await;

	println!("Login result: {}", serde_json::to_string_pretty(&login)?);

	let Some(token) = login.token() else {
		return Ok(());
	};
	let first = client.get_profile(token).await;
	let second = client.get_profile(token).await;

	println!("Profile: {}", serde_json::to_string_pretty(&first)?);
	println!("Profiles match: {}", first == second);
	println!(
		"Remote calls: login={}, profile={}; cache hits={}",
		login_mock.calls_async().await,
		profile_mock.calls_async().await,
		client.cache_metrics.hits(),
	);

	Ok(())
}
