//! Demonstrates plugging a custom [`ApiTransport`] into the client.
//!
//! The transport below answers from a canned table instead of the network, which is how a host
//! would wire in its own HTTP stack or a test double. Status classification, JSON normalization,
//! and error messages stay identical to the reqwest-backed client.

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use external_auth_client::{
	cache::MemoryCache,
	client::ExternalAuthClient,
	config::ClientConfig,
	error::Error,
	http::{ApiRequest, ApiTransport, RawResponse, TransportFuture},
};

#[derive(Debug, Default)]
struct CannedTransport {
	routes: HashMap<String, RawResponse>,
}
impl CannedTransport {
	fn route(mut self, path: &str, status: u16, body: &str) -> Self {
		self.routes.insert(path.to_owned(), RawResponse::new(status, body));

		self
	}
}
impl ApiTransport for CannedTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let response = self.routes.get(request.url.path()).cloned();

		Box::pin(async move { response.ok_or(Error::Connection) })
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let transport = CannedTransport::default()
		.route("/auth/me", 200, r#"{"id":42}"#)
		.route("/auth/refresh", 200, r#"{"token":"renewed-token"}"#)
		.route("/students/42/formations", 200, r#"{"formations":[{"id":1,"title":"Rust"}]}"#)
		.route("/students/42/schedule", 502, "<html>Bad Gateway</html>");
	let config =
		ClientConfig::new().with_base_url("https://api.school.test").with_api_key("demo-app-key");
	let client: ExternalAuthClient<CannedTransport> =
		ExternalAuthClient::with_transport(config, Arc::new(MemoryCache::new()), transport);

	println!("Token valid: {}", client.verify_token("student-token").await);
	println!("Refreshed: {:?}", client.refresh_token("student-token").await);
	println!("Formations: {}", client.get_formations(42, "student-token").await.into_value());
	println!("Schedule: {}", client.get_schedule(42, "student-token").await.into_value());
	println!("Profile: {}", client.get_profile("student-token").await.into_value());

	Ok(())
}
