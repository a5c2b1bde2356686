//! Feedback endpoints.

// self
use crate::{_prelude::*, gateway::Gateway, http::HttpTransport, request::ApiRequest};

const FEEDBACKS: &str = "reviews/feedbacks/";

/// Feedback for a completed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewFeedback {
	/// Order the feedback is about.
	pub order: u64,
	/// Rating from 1 to 5.
	pub rating: u8,
	/// Optional free-text comment.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub comment: Option<String>,
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists all feedback.
	pub async fn list_feedbacks(&self) -> Result<Value> {
		self.issue(ApiRequest::get(FEEDBACKS).protected()).await
	}

	/// Submits feedback for an order.
	pub async fn submit_feedback(&self, feedback: &NewFeedback) -> Result<Value> {
		self.issue(ApiRequest::post(FEEDBACKS).json(feedback)?.protected()).await
	}
}
