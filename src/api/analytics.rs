//! Manager analytics over a date range.

// crates.io
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{
	_prelude::*, error::ConfigError, gateway::Gateway, http::HttpTransport, request::ApiRequest,
};

const RATING: &str = "analytics/rating/";
const REVENUE: &str = "analytics/revenue/";
const ORDER_COUNT: &str = "analytics/order-count/";
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Inclusive date range sent as the `start` and `end` query parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
	/// First day of the range.
	pub start: Date,
	/// Last day of the range.
	pub end: Date,
}
impl DateRange {
	/// Creates a range; `start` must not come after `end`.
	pub fn new(start: Date, end: Date) -> Result<Self, ConfigError> {
		if start > end {
			return Err(ConfigError::InvalidDateRange { start, end });
		}

		Ok(Self { start, end })
	}

	fn apply(&self, request: ApiRequest) -> Result<ApiRequest, ConfigError> {
		let start = self.start.format(DATE_FORMAT).map_err(ConfigError::DateFormat)?;
		let end = self.end.format(DATE_FORMAT).map_err(ConfigError::DateFormat)?;

		Ok(request.query("start", start).query("end", end))
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Rating statistics for the range.
	pub async fn rating(&self, range: DateRange) -> Result<Value> {
		self.analytics(RATING, range).await
	}

	/// Revenue statistics for the range.
	pub async fn revenue(&self, range: DateRange) -> Result<Value> {
		self.analytics(REVENUE, range).await
	}

	/// Order counts for the range.
	pub async fn order_count(&self, range: DateRange) -> Result<Value> {
		self.analytics(ORDER_COUNT, range).await
	}

	async fn analytics(&self, path: &str, range: DateRange) -> Result<Value> {
		self.issue(range.apply(ApiRequest::get(path))?.protected()).await
	}
}
