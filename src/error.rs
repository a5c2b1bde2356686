//! Gateway-level error types shared across the session, transport, and endpoint layers.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); the request never completed.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Server answered 401 and the call could not be recovered.
	#[error("{message}")]
	Unauthorized {
		/// Server- or gateway-supplied message.
		message: String,
	},
	/// Server answered with a non-2xx status other than 401.
	#[error("{message}")]
	Api {
		/// HTTP status code.
		status: StatusCode,
		/// Server- or gateway-supplied message.
		message: String,
	},
	/// A refresh was requested but no refresh token is stored.
	#[error("No refresh token available.")]
	MissingRefreshToken,
	/// A concurrent refresh this call was waiting on did not succeed.
	#[error("Credential refresh failed.")]
	RefreshFailed,
}
impl Error {
	/// Returns the HTTP status code carried by the error, when one exists.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
			Self::Api { status, .. } => Some(*status),
			Self::Decode(err) => err.status,
			_ => None,
		}
	}

	/// Returns `true` when the server rejected the caller's credentials.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Unauthorized { .. })
	}

	/// Returns `true` when the request never produced an HTTP response.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}

/// Configuration and validation failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Stored access token cannot be sent as an `Authorization` header value.
	#[error("Access token contains characters that are not valid in an HTTP header.")]
	InvalidBearer,
	/// Descriptor validation failed.
	#[error(transparent)]
	Descriptor(#[from] crate::descriptor::ApiDescriptorError),
	/// Endpoint path could not be joined onto the base URL.
	#[error("Endpoint path `{path}` cannot be resolved against the base URL.")]
	InvalidEndpoint {
		/// Offending relative path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// JSON request body could not be serialized.
	#[error("Request body could not be serialized to JSON.")]
	RequestBody(#[source] serde_json::Error),
	/// Analytics range ends before it starts.
	#[error("Date range starts on {start} but ends on {end}.")]
	InvalidDateRange {
		/// First day requested.
		start: time::Date,
		/// Last day requested.
		end: time::Date,
	},
	/// A date could not be rendered as a query parameter.
	#[error("Date could not be formatted.")]
	DateFormat(#[source] time::error::Format),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{endpoint}`.")]
	Network {
		/// Endpoint path that was being called.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint: endpoint.into(), source: Box::new(src) }
	}
}

/// Successful response whose body could not be decoded into the expected type.
#[derive(Debug, ThisError)]
#[error("Response from `{endpoint}` does not match the expected shape at `{}`.", .source.path())]
pub struct DecodeError {
	/// Endpoint path that produced the body.
	pub endpoint: String,
	/// HTTP status code of the decoded response.
	pub status: Option<StatusCode>,
	/// Structured parsing failure including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_helper_covers_http_variants() {
		let unauthorized = Error::Unauthorized { message: "Token expired".into() };
		let api = Error::Api { status: StatusCode::NOT_FOUND, message: "Order not found".into() };

		assert_eq!(unauthorized.status(), Some(StatusCode::UNAUTHORIZED));
		assert!(unauthorized.is_unauthorized());
		assert_eq!(api.status(), Some(StatusCode::NOT_FOUND));
		assert_eq!(api.to_string(), "Order not found");
		assert_eq!(Error::MissingRefreshToken.status(), None);
	}

	#[test]
	fn decode_error_reports_json_path() {
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct Shape {
			access: String,
		}

		let mut de = serde_json::Deserializer::from_str("{\"access\":7}");
		let source = serde_path_to_error::deserialize::<_, Shape>(&mut de)
			.expect_err("Numeric access field should fail to decode.");
		let err = DecodeError {
			endpoint: "accounts/token/refresh/".into(),
			status: Some(StatusCode::OK),
			source,
		};

		assert!(err.to_string().contains("at `access`"));
		assert_eq!(Error::from(err).status(), Some(StatusCode::OK));
	}
}
