//! Resilient async client for a remote student API. Student login, cached profile lookups and
//! token checks all share one normalized error contract.
//!
//! Every call funnels through [`client::ExternalAuthClient::send`], which owns URL joining,
//! header injection, JSON normalization, and error classification. The domain operations on
//! top of it never fail; they translate errors into [`model::AuthResult`],
//! [`model::ApiPayload`], booleans, or options the host application can render directly.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
pub mod secret;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tracing_subscriber as _};
