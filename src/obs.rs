//! Optional observability for gateway calls and refreshes.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every call inside a `restaurant_gateway.call` span. The span carries
//!   `call` (kind) and `stage` (call site), and gains `outcome` plus the HTTP `status` (when the
//!   failure has one) once the call finishes.
//! - Enable `metrics` to increment `restaurant_gateway_call_total{call,outcome}` once per finished
//!   call and `restaurant_gateway_refresh_total{outcome}` once per refresh decision.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Call kinds observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// First transmission of a caller's request.
	Issue,
	/// Access-token refresh against the refresh endpoint.
	Refresh,
	/// Second transmission after a successful refresh.
	Replay,
	/// Staff or diner login.
	Login,
	/// Logout.
	Logout,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Issue => "issue",
			CallKind::Refresh => "refresh",
			CallKind::Replay => "replay",
			CallKind::Login => "login",
			CallKind::Logout => "logout",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How a finished call ended, as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// 2xx response, decoded where a body was expected.
	Ok,
	/// HTTP 401 that could not be recovered.
	Unauthorized,
	/// Any other non-2xx response.
	Rejected,
	/// The request never produced a response.
	Unreachable,
	/// A 2xx body that did not match the expected shape.
	Undecodable,
	/// Local failure: storage, request construction, or a missing refresh token.
	Aborted,
}
impl CallOutcome {
	/// Classifies a call result.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => Self::Ok,
			Err(Error::Unauthorized { .. }) => Self::Unauthorized,
			Err(Error::Api { .. }) => Self::Rejected,
			Err(Error::Transport(_)) => Self::Unreachable,
			Err(Error::Decode(_)) => Self::Undecodable,
			Err(_) => Self::Aborted,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Ok => "ok",
			CallOutcome::Unauthorized => "unauthorized",
			CallOutcome::Rejected => "rejected",
			CallOutcome::Unreachable => "unreachable",
			CallOutcome::Undecodable => "undecodable",
			CallOutcome::Aborted => "aborted",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What a single refresh decision amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// The refresh endpoint issued a new access token and it was stored.
	Refreshed,
	/// A 401 recovery reused a refresh performed on behalf of another call.
	Coalesced,
	/// The refresh endpoint answered non-2xx or without a usable `access` field.
	Rejected,
	/// The refresh endpoint could not be reached.
	Unreachable,
	/// A new access token was issued but the store refused to persist it.
	Unpersisted,
	/// No refresh token was stored, so nothing was sent.
	MissingToken,
}
impl RefreshOutcome {
	const ALL: [Self; 6] = [
		Self::Refreshed,
		Self::Coalesced,
		Self::Rejected,
		Self::Unreachable,
		Self::Unpersisted,
		Self::MissingToken,
	];

	/// Classifies a failed exchange with the refresh endpoint.
	pub fn of_exchange_failure(err: &Error) -> Self {
		if err.is_transport() { Self::Unreachable } else { Self::Rejected }
	}

	/// Returns a stable label suitable for metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Refreshed => "refreshed",
			RefreshOutcome::Coalesced => "coalesced",
			RefreshOutcome::Rejected => "rejected",
			RefreshOutcome::Unreachable => "unreachable",
			RefreshOutcome::Unpersisted => "unpersisted",
			RefreshOutcome::MissingToken => "missing_token",
		}
	}

	/// Whether this outcome involved a request to the refresh endpoint.
	pub const fn sent_exchange(self) -> bool {
		!matches!(self, Self::Coalesced | Self::MissingToken)
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Per-outcome refresh counters shared by a gateway and its clones.
///
/// Every update is mirrored to `restaurant_gateway_refresh_total` when the `metrics` feature is
/// enabled.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	counts: [AtomicU64; 6],
}
impl RefreshMetrics {
	/// Returns how many refresh decisions ended with `outcome`.
	pub fn count(&self, outcome: RefreshOutcome) -> u64 {
		self.counts[outcome as usize].load(Ordering::Relaxed)
	}

	/// Returns the number of requests sent to the refresh endpoint.
	pub fn attempts(&self) -> u64 {
		self.sum(|outcome| outcome.sent_exchange())
	}

	/// Returns the number of refreshes that stored a new access token.
	pub fn successes(&self) -> u64 {
		self.count(RefreshOutcome::Refreshed)
	}

	/// Returns the number of refresh requests that did not yield a stored access token.
	pub fn failures(&self) -> u64 {
		self.sum(|outcome| outcome.sent_exchange() && outcome != RefreshOutcome::Refreshed)
	}

	/// Returns the number of 401 recoveries that reused another call's refresh.
	pub fn coalesced(&self) -> u64 {
		self.count(RefreshOutcome::Coalesced)
	}

	pub(crate) fn record(&self, outcome: RefreshOutcome) {
		self.counts[outcome as usize].fetch_add(1, Ordering::Relaxed);

		#[cfg(feature = "metrics")]
		{
			metrics::counter!("restaurant_gateway_refresh_total", "outcome" => outcome.as_str())
				.increment(1);
		}
	}

	fn sum(&self, filter: impl Fn(RefreshOutcome) -> bool) -> u64 {
		RefreshOutcome::ALL
			.into_iter()
			.filter(|outcome| filter(*outcome))
			.map(|outcome| self.count(outcome))
			.sum()
	}
}

/// Span and counter pair wrapped around one gateway call.
#[derive(Clone, Debug)]
pub struct CallSpan {
	kind: CallKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span tagged with the provided call kind and stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"restaurant_gateway.call",
				call = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
				status = tracing::field::Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Call kind this span was opened for.
	pub fn kind(&self) -> CallKind {
		self.kind
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records how the call ended on the span and the call counter, returning the outcome.
	pub fn finish<T>(&self, result: &Result<T>) -> CallOutcome {
		let outcome = CallOutcome::of(result);

		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if let Some(status) = result.as_ref().err().and_then(Error::status) {
				self.span.record("status", status.as_u16());
			}
		}
		#[cfg(feature = "metrics")]
		{
			metrics::counter!(
				"restaurant_gateway_call_total",
				"call" => self.kind.as_str(),
				"outcome" => outcome.as_str()
			)
			.increment(1);
		}

		outcome
	}
}

/// Emits a debug event inside the current span (when tracing is enabled).
pub fn trace_event(kind: CallKind, message: &'static str, status: Option<StatusCode>) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(call = kind.as_str(), status = status.map(|s| s.as_u16()), "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, message, status);
	}
}
