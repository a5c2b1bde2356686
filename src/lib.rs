//! Authenticated request gateway and typed endpoint client for the restaurant ordering API.
//!
//! The [`gateway::Gateway`] owns the caller's session, attaches bearer credentials, and performs
//! a single-flight refresh followed by exactly one replay whenever a replayable call hits HTTP
//! 401. The [`api`] module layers typed wrappers for accounts, menu, orders, reviews, and
//! analytics endpoints on top of it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod descriptor;
pub mod error;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod request;
pub mod store;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Session, StorageKeys},
		descriptor::ApiDescriptor,
		gateway::Gateway,
		http::ReqwestHttpClient,
		store::{CredentialStore, MemoryStore},
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = Gateway<ReqwestHttpClient>;

	/// Builds a descriptor pointing at `base_url` with default endpoint paths.
	pub fn test_descriptor(base_url: &str) -> ApiDescriptor {
		let url = Url::parse(base_url).expect("Failed to parse test base URL.");

		ApiDescriptor::builder(url).build().expect("Test descriptor should build successfully.")
	}

	/// Constructs a [`Gateway`] backed by an in-memory store and the default reqwest transport.
	///
	/// The store is seeded with the provided tokens before the session loads it.
	pub async fn build_reqwest_test_gateway(
		descriptor: ApiDescriptor,
		access: Option<&str>,
		refresh: Option<&str>,
	) -> (ReqwestTestGateway, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());

		seed_tokens(&store_backend, access, refresh).await;

		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let session = Session::init(store, StorageKeys::default())
			.await
			.expect("Session over a memory store should initialize.");
		let gateway = Gateway::new(descriptor, Arc::new(session));

		(gateway, store_backend)
	}

	/// Reads the persisted value stored under `key`.
	pub async fn stored(store: &MemoryStore, key: &str) -> Option<String> {
		store.get(key).await.expect("Memory store reads should not fail.")
	}

	/// Seeds the store with the provided access/refresh pair under the default keys.
	pub async fn seed_tokens(store: &MemoryStore, access: Option<&str>, refresh: Option<&str>) {
		let keys = StorageKeys::default();

		if let Some(access) = access {
			store.set(keys.access(), access).await.expect("Failed to seed access token.");
		}
		if let Some(refresh) = refresh {
			store.set(keys.refresh(), refresh).await.expect("Failed to seed refresh token.");
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use http::StatusCode;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
