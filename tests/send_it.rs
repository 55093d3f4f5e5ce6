#![cfg(feature = "reqwest")]

mod common;

// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use serde_json::json;
// self
use common::{API_KEY, TOKEN};
use external_auth_client::{client::ApiCall, config::ClientConfig, error::{ConfigError, Error}};

#[tokio::test]
async fn send_injects_json_and_bearer_headers() -> Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/sync")
				.query_param("page", "2")
				.header("content-type", "application/json")
				.header("accept", "application/json")
				.header("authorization", format!("Bearer {TOKEN}"))
				.json_body(json!({ "since": "2025-01-01" }));
			then.status(201).json_body(json!({ "queued": true }));
		})
		.await;
	let (client, _clock) = common::build_client(&server);
	let body = client
		.send(
			ApiCall::post("sync")
				.with_token(TOKEN)
				.with_query("page", "2")
				.with_body(json!({ "since": "2025-01-01" })),
		)
		.await?;

	assert_eq!(body, json!({ "queued": true }));

	mock.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn mock_server_is_reached_over_plain_http() -> Result<()> {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/me");
			then.status(200).json_body(json!({ "id": 1 }));
		})
		.await;

	assert!(server.base_url().starts_with("http://"), "{}", server.base_url());

	let (client, _clock) = common::build_client(&server);

	assert_eq!(client.send(ApiCall::get("/auth/me")).await?, json!({ "id": 1 }));

	Ok(())
}

#[tokio::test]
async fn send_omits_authorization_without_token() -> Result<()> {
	let server = MockServer::start_async().await;
	let anonymous = server
		.mock_async(|when, then| {
			when.method(GET).path("/health").header_missing("authorization");
			then.status(200).json_body(json!({ "ok": true }));
		})
		.await;
	let (client, _clock) = common::build_client(&server);

	client.send(ApiCall::get("/health")).await?;
	client.send(ApiCall::get("/health").with_token("")).await?;

	anonymous.assert_calls_async(2).await;

	Ok(())
}

#[tokio::test]
async fn send_joins_base_url_with_a_single_slash() -> Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me");
			then.status(200).json_body(json!({ "id": 1 }));
		})
		.await;
	let config = ClientConfig::new()
		.with_base_url(format!("{}/api/", server.base_url()))
		.with_api_key(API_KEY);
	let (client, _clock) = common::build_client_with(config);

	client.send(ApiCall::get("/auth/me")).await?;
	client.send(ApiCall::get("auth/me")).await?;

	mock.assert_calls_async(2).await;

	Ok(())
}

#[tokio::test]
async fn send_wraps_non_json_success_bodies() -> Result<()> {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/motd");
			then.status(200).header("content-type", "text/plain").body("hello students");
		})
		.await;

	let (client, _clock) = common::build_client(&server);
	let body = client.send(ApiCall::get("/motd")).await?;

	assert_eq!(body, json!({ "raw": "hello students" }));

	Ok(())
}

#[tokio::test]
async fn send_classifies_remote_failures() -> Result<()> {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/gateway");
			then.status(502).body("<html>Bad Gateway</html>");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/locked");
			then.status(423).json_body(json!({ "error": { "code": "locked" } }));
		})
		.await;

	let (client, _clock) = common::build_client(&server);
	let gateway = client
		.send(ApiCall::get("/gateway"))
		.await
		.err()
		.ok_or_else(|| eyre!("A 502 response must fail."))?;

	assert_eq!(gateway.message(), "HTTP 502");
	assert_eq!(gateway.status_code(), Some(502));
	assert_eq!(gateway.response_body(), Some(&json!({ "raw": "<html>Bad Gateway</html>" })));
	assert!(!gateway.is_retryable());

	let locked = client
		.send(ApiCall::get("/locked"))
		.await
		.err()
		.ok_or_else(|| eyre!("A 423 response must fail."))?;

	assert_eq!(locked.message(), r#"{"code":"locked"}"#);
	assert_eq!(locked.status_code(), Some(423));

	Ok(())
}

#[tokio::test]
async fn send_classifies_network_failures() -> Result<()> {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/slow");
			then.status(200).delay(std::time::Duration::from_millis(1_500)).json_body(json!({}));
		})
		.await;

	let config = ClientConfig::new()
		.with_base_url(server.base_url())
		.with_timeout(time::Duration::milliseconds(100));
	let (client, _clock) = common::build_client_with(config);
	let timeout = client
		.send(ApiCall::get("/slow"))
		.await
		.err()
		.ok_or_else(|| eyre!("A delayed response must time out."))?;

	assert!(matches!(timeout, Error::Timeout), "{timeout:?}");
	assert_eq!(timeout.message(), "Request timeout - API server not responding");
	assert!(timeout.is_retryable());

	let connection = common::unreachable_client()
		.send(ApiCall::get("/auth/me"))
		.await
		.err()
		.ok_or_else(|| eyre!("A closed port must fail."))?;

	assert!(matches!(connection, Error::Connection), "{connection:?}");
	assert_eq!(connection.message(), "Connection error - Cannot reach API server");

	Ok(())
}

#[tokio::test]
async fn send_requires_base_url() {
	let (client, _clock) = common::build_client_with(ClientConfig::new().with_api_key(API_KEY));
	let err = client.send(ApiCall::get("/auth/me")).await;

	assert!(matches!(err, Err(Error::Config(ConfigError::MissingBaseUrl))));
}
