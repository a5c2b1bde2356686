//! Status interpretation and body decoding for gateway responses.

// self
use crate::{_prelude::*, error::DecodeError, http::ApiResponse};

/// JSON fields inspected for a human-readable failure message, in priority order.
const MESSAGE_FIELDS: [&str; 2] = ["message", "error"];

/// Builds the error for a non-2xx response.
///
/// The body is parsed as JSON and the first non-empty string among `message` and `error` becomes
/// the error message; an absent or unparsable body falls back to `HTTP error! status: <code>`.
/// A 401 maps to [`Error::Unauthorized`], every other status to [`Error::Api`].
pub fn decode_error(status: StatusCode, body: &[u8]) -> Error {
	let message =
		error_message(body).unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

	if status == StatusCode::UNAUTHORIZED {
		Error::Unauthorized { message }
	} else {
		Error::Api { status, message }
	}
}

fn error_message(body: &[u8]) -> Option<String> {
	let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
		return None;
	};

	MESSAGE_FIELDS.iter().find_map(|name| match fields.get(*name) {
		Some(Value::String(message)) if !message.trim().is_empty() => Some(message.clone()),
		_ => None,
	})
}

/// Passes 2xx responses through and converts everything else into an error.
pub(crate) fn ensure_success(response: ApiResponse) -> Result<ApiResponse> {
	if response.status().is_success() {
		Ok(response)
	} else {
		Err(decode_error(response.status(), response.body()))
	}
}

/// Decodes a successful body into untyped JSON.
pub(crate) fn decode_value(endpoint: &str, response: &ApiResponse) -> Result<Value> {
	decode_typed(endpoint, response)
}

/// Decodes a successful body into `T`, reporting the JSON path of any mismatch.
pub(crate) fn decode_typed<T>(endpoint: &str, response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let body: &[u8] = match response.body().as_slice() {
		raw if raw.iter().all(u8::is_ascii_whitespace) => b"null",
		raw => raw,
	};
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		let status = Some(response.status());

		DecodeError { endpoint: endpoint.to_owned(), status, source }.into()
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn message_field_wins_over_error_field() {
		let body = br#"{"error":"Invalid credentials","message":"Bad login"}"#;
		let err = decode_error(StatusCode::BAD_REQUEST, body);

		assert!(matches!(err, Error::Api { status: StatusCode::BAD_REQUEST, .. }));
		assert_eq!(err.to_string(), "Bad login");

		let body = br#"{"success":false,"error":"Not logged in"}"#;
		let err = decode_error(StatusCode::FORBIDDEN, body);

		assert_eq!(err.to_string(), "Not logged in");
	}

	#[test]
	fn unparsable_or_empty_bodies_fall_back_to_status() {
		let html = decode_error(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
		let empty = decode_error(StatusCode::BAD_GATEWAY, b"");
		let blank = decode_error(StatusCode::BAD_REQUEST, br#"{"message":""}"#);

		assert_eq!(html.to_string(), "HTTP error! status: 500");
		assert_eq!(empty.to_string(), "HTTP error! status: 502");
		assert_eq!(blank.to_string(), "HTTP error! status: 400");
	}

	#[test]
	fn unauthorized_maps_to_dedicated_variant() {
		let err = decode_error(StatusCode::UNAUTHORIZED, br#"{"detail":"Given token not valid"}"#);

		assert!(err.is_unauthorized());
		assert_eq!(err.to_string(), "HTTP error! status: 401");
	}

	#[test]
	fn empty_success_body_decodes_to_null() {
		let mut response = ApiResponse::new(Vec::new());

		*response.status_mut() = StatusCode::NO_CONTENT;

		assert_eq!(
			decode_value("accounts/logout/", &response).expect("Empty body should decode."),
			Value::Null
		);
	}

	#[test]
	fn typed_decode_reports_path() {
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct Refresh {
			access: String,
		}

		let response = ApiResponse::new(br#"{"access":null}"#.to_vec());
		let err = decode_typed::<Refresh>("accounts/token/refresh/", &response)
			.expect_err("Null access token should fail typed decoding.");

		assert!(matches!(err, Error::Decode(_)));
		assert!(err.to_string().contains("`access`"));
	}
}
