// self
use crate::{
	_prelude::*,
	descriptor::{ApiDescriptor, ApiEndpoints, RefreshFailurePolicy},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ApiDescriptorError {
	/// Base URL must use HTTP or HTTPS.
	#[error("The base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL must be able to carry relative paths.
	#[error("The base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL must not carry a query or fragment.
	#[error("The base URL must not carry a query or fragment: {url}.")]
	UnexpectedSuffix {
		/// Base URL that failed validation.
		url: String,
	},
	/// Endpoint paths must be relative to the base URL.
	#[error("The {endpoint} endpoint must be a relative path: {path}.")]
	AbsoluteEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Path that failed validation.
		path: String,
	},
	/// Endpoint paths must not be empty.
	#[error("The {endpoint} endpoint path is empty.")]
	EmptyEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
	},
}

/// Builder for [`ApiDescriptor`] values.
#[derive(Debug)]
pub struct ApiDescriptorBuilder {
	/// Base URL for every endpoint.
	pub base_url: Url,
	/// Endpoint paths used by the gateway.
	pub endpoints: ApiEndpoints,
	/// Refresh-failure policy.
	pub refresh_failure_policy: RefreshFailurePolicy,
}
impl ApiDescriptorBuilder {
	/// Creates a new builder seeded with the provided base URL and default endpoint paths.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			endpoints: ApiEndpoints::default(),
			refresh_failure_policy: RefreshFailurePolicy::default(),
		}
	}

	/// Overrides the staff login path.
	pub fn staff_login_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.staff_login = path.into();

		self
	}

	/// Overrides the diner login path.
	pub fn diner_login_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.diner_login = path.into();

		self
	}

	/// Overrides the logout path.
	pub fn logout_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.logout = path.into();

		self
	}

	/// Overrides the token refresh path.
	pub fn token_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.token_refresh = path.into();

		self
	}

	/// Overrides the refresh-failure policy.
	pub fn refresh_failure_policy(mut self, policy: RefreshFailurePolicy) -> Self {
		self.refresh_failure_policy = policy;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ApiDescriptor, ApiDescriptorError> {
		let mut base_url = self.base_url;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let descriptor = ApiDescriptor {
			base_url,
			endpoints: self.endpoints,
			refresh_failure_policy: self.refresh_failure_policy,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ApiDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ApiDescriptorError> {
		let url = &self.base_url;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(ApiDescriptorError::UnsupportedScheme { url: url.to_string() });
		}
		if url.cannot_be_a_base() {
			return Err(ApiDescriptorError::CannotBeABase { url: url.to_string() });
		}
		if url.query().is_some() || url.fragment().is_some() {
			return Err(ApiDescriptorError::UnexpectedSuffix { url: url.to_string() });
		}

		validate_endpoint("staff_login", &self.endpoints.staff_login)?;
		validate_endpoint("diner_login", &self.endpoints.diner_login)?;
		validate_endpoint("logout", &self.endpoints.logout)?;
		validate_endpoint("token_refresh", &self.endpoints.token_refresh)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, path: &str) -> Result<(), ApiDescriptorError> {
	if path.trim().is_empty() {
		return Err(ApiDescriptorError::EmptyEndpoint { endpoint: name });
	}
	if path.contains("://") || path.starts_with("//") {
		return Err(ApiDescriptorError::AbsoluteEndpoint { endpoint: name, path: path.to_owned() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse descriptor fixture URL.")
	}

	#[test]
	fn builder_rejects_unsupported_schemes_and_absolute_paths() {
		let err = ApiDescriptor::builder(url("ftp://example.com/api/"))
			.build()
			.expect_err("Descriptor builder should reject non-HTTP schemes.");

		assert!(matches!(err, ApiDescriptorError::UnsupportedScheme { .. }));

		let err = ApiDescriptor::builder(url("https://example.com/api/"))
			.token_refresh_path("https://evil.example.com/refresh/")
			.build()
			.expect_err("Descriptor builder should reject absolute endpoint paths.");

		assert!(matches!(
			err,
			ApiDescriptorError::AbsoluteEndpoint { endpoint: "token_refresh", .. }
		));

		let err = ApiDescriptor::builder(url("https://example.com/api/?debug=1"))
			.build()
			.expect_err("Descriptor builder should reject base URLs with a query.");

		assert!(matches!(err, ApiDescriptorError::UnexpectedSuffix { .. }));
	}

	#[test]
	fn builder_applies_overrides() {
		let descriptor = ApiDescriptor::builder(url("https://example.com/api/"))
			.logout_path("auth/logout/")
			.refresh_failure_policy(RefreshFailurePolicy::ClearOnAnyFailure)
			.build()
			.expect("Descriptor builder should accept relative overrides.");

		assert_eq!(descriptor.endpoints.logout, "auth/logout/");
		assert_eq!(descriptor.endpoints.staff_login, "accounts/staff/login/");
		assert_eq!(descriptor.refresh_failure_policy, RefreshFailurePolicy::ClearOnAnyFailure);
	}
}
