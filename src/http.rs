//! Transport primitives for gateway calls.
//!
//! Requests and responses are plain [`http`] values: [`WireRequest`] is a fully encoded
//! `http::Request<Vec<u8>>` and [`ApiResponse`] the raw `http::Response<Vec<u8>>` that came back.
//! Downstream crates plug in their own HTTP stack (or a fake one in tests) by implementing
//! [`HttpTransport`]. The transport only moves bytes: bearer headers, status interpretation, and
//! retries all stay in the gateway.

// self
use crate::_prelude::*;

/// Fully encoded request handed to a transport.
pub type WireRequest = http::Request<Vec<u8>>;

/// Raw response returned by a transport, whatever its status.
pub type ApiResponse = http::Response<Vec<u8>>;

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing gateway calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared behind an
/// `Arc` by every clone of the gateway, and the returned future must be `Send` so callers can
/// drive gateway calls from any executor thread.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport when no response was received.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends the encoded request and returns the raw response.
	fn send(&self, request: WireRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl std::ops::Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn send(&self, request: WireRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(reqwest::Request::try_from(request)?).await?;
			let status = response.status();
			let headers = response.headers().clone();
			let mut api_response = ApiResponse::new(response.bytes().await?.to_vec());

			*api_response.status_mut() = status;
			*api_response.headers_mut() = headers;

			Ok(api_response)
		})
	}
}
