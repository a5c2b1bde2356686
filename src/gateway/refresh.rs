//! Access-token refresh with a single-flight gate and one-shot replay.
//!
//! Every refresh runs while holding the gateway's [`RefreshGate`] lock. When a refresh finishes
//! it publishes a ticket naming the access token it replaced and whether it succeeded; calls
//! that were rejected with that same token while the refresh was in flight reuse the ticket
//! instead of hitting the refresh endpoint again.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	gateway::{Gateway, response},
	http::{ApiResponse, HttpTransport},
	obs::{self, CallKind, CallSpan, RefreshOutcome},
	request::ApiRequest,
};

/// Body returned by the token refresh endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
	/// Newly minted access token.
	pub access: String,
}

#[derive(Clone, Debug)]
struct RefreshTicket {
	generation: u64,
	replaced: Option<TokenSecret>,
	refreshed: bool,
}

/// Serializes refreshes and publishes the outcome of the latest one.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
	lock: AsyncMutex<()>,
	generation: AtomicU64,
	last: Mutex<Option<RefreshTicket>>,
}
impl RefreshGate {
	/// Number of refreshes completed so far.
	pub(crate) fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	/// Returns the outcome of a refresh that completed after `observed` and replaced `stale`.
	fn published_for(&self, observed: u64, stale: &Option<TokenSecret>) -> Option<bool> {
		self.last
			.lock()
			.as_ref()
			.filter(|ticket| ticket.generation > observed && &ticket.replaced == stale)
			.map(|ticket| ticket.refreshed)
	}

	fn publish(&self, replaced: Option<TokenSecret>, refreshed: bool) {
		let mut last = self.last.lock();
		let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

		*last = Some(RefreshTicket { generation, replaced, refreshed });
	}

	/// Forgets the published ticket; used when a new session starts or ends.
	pub(crate) fn reset(&self) {
		*self.last.lock() = None;
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Exchanges the stored refresh token for a new access token.
	///
	/// Fails with [`Error::MissingRefreshToken`] without any network call when no refresh token
	/// is stored. On success only the access token is overwritten. On failure the stored
	/// credentials are cleared according to the descriptor's
	/// [`RefreshFailurePolicy`](crate::descriptor::RefreshFailurePolicy); if clearing fails, the
	/// storage error is returned in place of the refresh failure.
	pub async fn refresh(&self) -> Result<TokenSecret> {
		let _singleflight = self.refresh_gate.lock.lock().await;
		let stale = self.session.access_token();
		let result = self.refresh_locked().await;

		self.refresh_gate.publish(stale, result.is_ok());

		result
	}

	/// Recovers from a 401 on a replayable request: one refresh, then exactly one replay.
	///
	/// When the refresh fails the original 401 is surfaced and the request is not replayed,
	/// unless the store failed while updating or clearing the credentials; that storage error
	/// is returned instead.
	pub(crate) async fn handle_unauthorized(
		&self,
		request: &ApiRequest,
		stale: Option<TokenSecret>,
		observed: u64,
		original: ApiResponse,
	) -> Result<ApiResponse> {
		match self.refresh_after_unauthorized(stale, observed).await {
			Ok(()) => self.replay(request).await,
			Err(err @ Error::Storage(_)) => Err(err),
			Err(_) => Err(response::decode_error(original.status(), original.body())),
		}
	}

	async fn refresh_after_unauthorized(
		&self,
		stale: Option<TokenSecret>,
		observed: u64,
	) -> Result<()> {
		let _singleflight = self.refresh_gate.lock.lock().await;

		if let Some(refreshed) = self.refresh_gate.published_for(observed, &stale) {
			self.refresh_metrics.record(RefreshOutcome::Coalesced);

			return if refreshed { Ok(()) } else { Err(Error::RefreshFailed) };
		}

		let current = self.session.access_token();

		if current.is_some() && current != stale {
			// Rotated by a login or refresh that finished before this call was rejected.
			self.refresh_metrics.record(RefreshOutcome::Coalesced);

			return Ok(());
		}

		let result = self.refresh_locked().await.map(|_| ());

		self.refresh_gate.publish(stale, result.is_ok());

		result
	}

	/// Performs the refresh call; the caller must hold the gate lock.
	async fn refresh_locked(&self) -> Result<TokenSecret> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh");
		let result = span
			.instrument(async move {
				let Some(refresh) = self.session.refresh_token() else {
					self.refresh_metrics.record(RefreshOutcome::MissingToken);

					return Err(Error::MissingRefreshToken);
				};
				let access = match self.exchange_refresh_token(&refresh).await {
					Ok(body) => TokenSecret::from(body.access),
					Err(err) => {
						self.refresh_metrics.record(RefreshOutcome::of_exchange_failure(&err));

						return Err(self.apply_failure_policy(err).await);
					},
				};

				if let Err(err) = self.session.replace_access(access.clone()).await {
					self.refresh_metrics.record(RefreshOutcome::Unpersisted);

					return Err(err);
				}

				self.refresh_metrics.record(RefreshOutcome::Refreshed);

				Ok(access)
			})
			.await;

		span.finish(&result);

		result
	}

	/// Clears the credentials when the failure policy asks for it and returns the error to
	/// surface.
	///
	/// When the store fails to remove the credentials, that [`Error::Storage`] replaces the
	/// exchange failure.
	async fn apply_failure_policy(&self, err: Error) -> Error {
		if !self.descriptor.refresh_failure_policy.clears_on(err.is_transport()) {
			return err;
		}

		obs::trace_event(CallKind::Refresh, "refresh failed, clearing credentials", err.status());

		match self.session.clear().await {
			Ok(()) => err,
			Err(cleared) => {
				obs::trace_event(CallKind::Refresh, "clearing credentials failed", err.status());

				cleared
			},
		}
	}

	async fn exchange_refresh_token(&self, refresh: &TokenSecret) -> Result<RefreshResponse> {
		let request = ApiRequest::post(self.descriptor.endpoints.token_refresh.as_str())
			.form_field("refresh", refresh.expose());
		let response = response::ensure_success(self.send(&request, None).await?)?;

		response::decode_typed(&request.path, &response)
	}

	/// Re-sends `request` with the current access token; never refreshes again.
	async fn replay(&self, request: &ApiRequest) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Replay;

		let span = CallSpan::new(KIND, "replay");
		let result = span
			.instrument(async move {
				let access = self.session.access_token();

				response::ensure_success(self.send(request, access.as_ref()).await?)
			})
			.await;

		span.finish(&result);

		result
	}
}
