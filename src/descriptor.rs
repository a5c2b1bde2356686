//! API descriptor: where the remote service lives and how the gateway treats it.
//!
//! The module exposes validated endpoint metadata, a builder, and the refresh-failure policy
//! so callers can point the gateway at any deployment of the restaurant API.

/// Builder API for assembling API descriptors.
pub mod builder;
/// Credential handling policies.
pub mod policy;

pub use builder::*;
pub use policy::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Relative paths of the endpoints the gateway itself calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoints {
	/// Staff login endpoint.
	pub staff_login: String,
	/// Diner (customer) login endpoint.
	pub diner_login: String,
	/// Logout endpoint.
	pub logout: String,
	/// Access-token refresh endpoint.
	pub token_refresh: String,
}
impl Default for ApiEndpoints {
	fn default() -> Self {
		Self {
			staff_login: "accounts/staff/login/".into(),
			diner_login: "accounts/diner/login/".into(),
			logout: "accounts/logout/".into(),
			token_refresh: "accounts/token/refresh/".into(),
		}
	}
}

/// Immutable API descriptor consumed by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiDescriptor {
	/// Base URL every relative endpoint path is resolved against; always ends with `/`.
	pub base_url: Url,
	/// Endpoint paths used by the gateway's own operations.
	pub endpoints: ApiEndpoints,
	/// What to do with stored credentials when a refresh fails.
	pub refresh_failure_policy: RefreshFailurePolicy,
}
impl ApiDescriptor {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> ApiDescriptorBuilder {
		ApiDescriptorBuilder::new(base_url)
	}

	/// Resolves a relative endpoint path against the base URL.
	pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url.join(path.trim_start_matches('/')).map_err(|source| {
			ConfigError::InvalidEndpoint { path: path.to_owned(), source }
		})
	}
}
