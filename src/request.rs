//! Replayable request descriptors.
//!
//! An [`ApiRequest`] captures everything needed to send a call: method, path, query, body, and
//! whether it carries credentials or may be replayed after a refresh. It is a plain value, so the
//! gateway replays it by re-encoding a clone with the refreshed access token.

// crates.io
pub use http::Method;

use http::{
	HeaderValue,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	descriptor::ApiDescriptor,
	error::ConfigError,
	http::WireRequest,
};

/// Request payload; a call carries exactly one encoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// `application/x-www-form-urlencoded` fields; keys may repeat.
	Form(Vec<(String, String)>),
	/// `application/json` document.
	Json(Value),
}
impl RequestBody {
	/// Content type matching the encoding, if a body is present.
	pub fn content_type(&self) -> Option<&'static str> {
		match self {
			RequestBody::Empty => None,
			RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
			RequestBody::Json(_) => Some("application/json"),
		}
	}

	/// Encodes the body into bytes; an empty body encodes to no bytes.
	pub fn encode(&self) -> Result<Vec<u8>, ConfigError> {
		match self {
			RequestBody::Empty => Ok(Vec::new()),
			RequestBody::Form(fields) => Ok(form_urlencoded::Serializer::new(String::new())
				.extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
				.finish()
				.into_bytes()),
			RequestBody::Json(value) => serde_json::to_vec(value).map_err(ConfigError::RequestBody),
		}
	}
}

/// Deferred, replayable description of one API call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the descriptor's base URL.
	pub path: String,
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
	/// Attach the bearer token when one is stored.
	pub requires_auth: bool,
	/// Allow one refresh-and-replay when the server answers 401.
	pub replayable: bool,
}
impl ApiRequest {
	/// Creates an unauthenticated, non-replayable request without a body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			body: RequestBody::Empty,
			requires_auth: false,
			replayable: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a form field, switching the body to form encoding if it was not already.
	pub fn form_field(mut self, key: impl Into<String>, value: impl Display) -> Self {
		let field = (key.into(), value.to_string());

		match &mut self.body {
			RequestBody::Form(fields) => fields.push(field),
			body => *body = RequestBody::Form(vec![field]),
		}

		self
	}

	/// Appends a form field only when a value is present.
	pub fn optional_form_field<V>(self, key: impl Into<String>, value: Option<V>) -> Self
	where
		V: Display,
	{
		match value {
			Some(value) => self.form_field(key, value),
			None => self,
		}
	}

	/// Appends one form field per value under the same key.
	pub fn repeated_form_field<I>(mut self, key: &str, values: I) -> Self
	where
		I: IntoIterator,
		I::Item: Display,
	{
		for value in values {
			self = self.form_field(key, value);
		}

		self
	}

	/// Replaces the body with the JSON encoding of `payload`.
	pub fn json<T>(mut self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let value = serde_json::to_value(payload).map_err(ConfigError::RequestBody)?;

		self.body = RequestBody::Json(value);

		Ok(self)
	}

	/// Marks the request as carrying the bearer token.
	pub fn authenticated(mut self) -> Self {
		self.requires_auth = true;

		self
	}

	/// Marks the request as eligible for one refresh-and-replay on 401.
	pub fn replayable(mut self) -> Self {
		self.replayable = true;

		self
	}

	/// Shorthand for [`authenticated`](Self::authenticated) plus [`replayable`](Self::replayable),
	/// the combination every protected endpoint uses.
	pub fn protected(self) -> Self {
		self.authenticated().replayable()
	}

	/// Encodes the request for the transport, attaching `bearer` when authentication is
	/// required.
	pub(crate) fn to_wire(
		&self,
		descriptor: &ApiDescriptor,
		bearer: Option<&TokenSecret>,
	) -> Result<WireRequest, ConfigError> {
		let mut url = descriptor.endpoint_url(&self.path)?;

		if !self.query.is_empty() {
			url.query_pairs_mut()
				.extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		let mut builder = http::Request::builder()
			.method(self.method.clone())
			.uri(url.as_str())
			.header(ACCEPT, HeaderValue::from_static("application/json"));

		if let Some(content_type) = self.body.content_type() {
			builder = builder.header(CONTENT_TYPE, HeaderValue::from_static(content_type));
		}
		if let Some(token) = bearer.filter(|_| self.requires_auth) {
			let mut value =
				HeaderValue::try_from(token.bearer()).map_err(|_| ConfigError::InvalidBearer)?;

			value.set_sensitive(true);

			builder = builder.header(AUTHORIZATION, value);
		}

		Ok(builder.body(self.body.encode()?)?)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn header<'a>(wire: &'a WireRequest, name: &str) -> Option<&'a str> {
		wire.headers().get(name).and_then(|value| value.to_str().ok())
	}

	fn descriptor() -> ApiDescriptor {
		let base = Url::parse("http://localhost:8000/api/").expect("Base URL should parse.");

		ApiDescriptor::builder(base).build().expect("Default descriptor should build.")
	}

	#[test]
	fn bearer_only_attached_when_required_and_present() {
		let descriptor = descriptor();
		let token = TokenSecret::new("A1");
		let public = ApiRequest::get("menu/menus/")
			.to_wire(&descriptor, Some(&token))
			.expect("Public request should encode.");
		let anonymous = ApiRequest::get("accounts/protected/")
			.protected()
			.to_wire(&descriptor, None)
			.expect("Protected request without a token should encode.");
		let protected = ApiRequest::get("accounts/protected/")
			.protected()
			.to_wire(&descriptor, Some(&token))
			.expect("Protected request should encode.");

		assert_eq!(header(&public, "authorization"), None);
		assert_eq!(header(&anonymous, "authorization"), None);
		assert_eq!(header(&protected, "authorization"), Some("Bearer A1"));
		assert!(protected.headers()[AUTHORIZATION].is_sensitive());
		assert_eq!(protected.method(), Method::GET);
		assert!(protected.body().is_empty());
	}

	#[test]
	fn form_fields_repeat_and_skip_missing_values() {
		let wire = ApiRequest::post("orders/update/")
			.form_field("order_id", 7)
			.repeated_form_field("item_ids", [1, 2])
			.optional_form_field("note", None::<&str>)
			.to_wire(&descriptor(), None)
			.expect("Form request should encode.");

		assert_eq!(header(&wire, "content-type"), Some("application/x-www-form-urlencoded"));
		assert_eq!(wire.body().as_slice(), b"order_id=7&item_ids=1&item_ids=2");
	}

	#[test]
	fn json_body_replaces_form_and_query_is_encoded() {
		let wire = ApiRequest::get("analytics/rating/")
			.query("start", "2025-01-01 00:00")
			.form_field("ignored", 1)
			.json(&serde_json::json!({ "user_ids": [3, 4] }))
			.expect("JSON payload should serialize.")
			.to_wire(&descriptor(), None)
			.expect("JSON request should encode.");

		assert_eq!(
			wire.uri().to_string(),
			"http://localhost:8000/api/analytics/rating/?start=2025-01-01+00%3A00"
		);
		assert_eq!(header(&wire, "content-type"), Some("application/json"));
		assert_eq!(wire.body().as_slice(), b"{\"user_ids\":[3,4]}");
	}
}
