//! Authenticated request gateway.
//!
//! [`Gateway`] is the single path every API call takes. It reads the access token from the
//! injected [`Session`], attaches it as a bearer header when the request asks for it, and drives
//! the per-call state machine:
//!
//! ```text
//! ISSUED -(2xx)-> DONE
//! ISSUED -(401, replayable)-> REFRESHING -(ok)-> REPLAYED -> DONE
//! ISSUED -(401, replayable)-> REFRESHING -(failed)-> FAILED (original 401 surfaced)
//! ISSUED -(401, not replayable)-> FAILED
//! ISSUED -(other non-2xx)-> FAILED
//! ```
//!
//! A replayed request is never refreshed again, so one logical call costs at most one refresh
//! and two transmissions.

pub mod login;
pub mod refresh;
pub mod response;

pub use login::*;
pub use refresh::RefreshResponse;
pub use response::decode_error;

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret},
	descriptor::ApiDescriptor,
	error::TransportError,
	gateway::refresh::RefreshGate,
	http::{ApiResponse, HttpTransport},
	obs::{self, CallKind, CallSpan, RefreshMetrics},
	request::ApiRequest,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Issues API calls on behalf of one session, keeping it authenticated.
///
/// Clones share the transport, session, metrics, and refresh gate, so concurrent calls made
/// through any clone coalesce their refreshes.
pub struct Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// API descriptor that defines the base URL, endpoints, and policies.
	pub descriptor: ApiDescriptor,
	/// Session holding the credential pair.
	pub session: Arc<Session>,
	/// Shared metrics recorder for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_gate: Arc<RefreshGate>,
}
impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ApiDescriptor,
		session: Arc<Session>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			session,
			refresh_metrics: Default::default(),
			refresh_gate: Default::default(),
		}
	}

	/// Sends `request` and returns the decoded JSON body of the successful response.
	///
	/// An empty success body decodes to [`Value::Null`].
	pub async fn issue(&self, request: ApiRequest) -> Result<Value> {
		let response = self.execute(CallKind::Issue, "issue", &request).await?;

		response::decode_value(&request.path, &response)
	}

	/// Sends `request` and decodes the successful body into `T`.
	///
	/// A body that does not match `T` fails with [`Error::Decode`] naming the offending JSON
	/// path.
	pub async fn issue_as<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.execute(CallKind::Issue, "issue_as", &request).await?;

		response::decode_typed(&request.path, &response)
	}

	/// Runs the per-call state machine and returns the successful raw response.
	async fn execute(
		&self,
		kind: CallKind,
		stage: &'static str,
		request: &ApiRequest,
	) -> Result<ApiResponse> {
		let span = CallSpan::new(kind, stage);
		let result = span
			.instrument(async move {
				let observed = self.refresh_gate.generation();
				let stale = self.session.access_token();
				let response = self.send(request, stale.as_ref()).await?;

				if response.status() == StatusCode::UNAUTHORIZED && request.replayable {
					obs::trace_event(
						kind,
						"access token rejected, refreshing",
						Some(StatusCode::UNAUTHORIZED),
					);

					return self.handle_unauthorized(request, stale, observed, response).await;
				}

				response::ensure_success(response)
			})
			.await;

		span.finish(&result);

		result
	}

	/// Encodes and transmits one request without interpreting the status.
	async fn send(
		&self,
		request: &ApiRequest,
		bearer: Option<&TokenSecret>,
	) -> Result<ApiResponse> {
		let wire = request.to_wire(&self.descriptor, bearer)?;

		self.http_client
			.send(wire)
			.await
			.map_err(|err| TransportError::network(&request.path, err).into())
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a new gateway with its own reqwest-backed transport.
	pub fn new(descriptor: ApiDescriptor, session: Arc<Session>) -> Self {
		Self::with_http_client(descriptor, session, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			session: self.session.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_gate: self.refresh_gate.clone(),
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("descriptor", &self.descriptor)
			.field("session", &self.session)
			.finish()
	}
}
