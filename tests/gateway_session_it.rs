#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use restaurant_gateway::{_preludet::*, gateway::LoginKind};

#[tokio::test]
async fn staff_login_stores_issued_pair() {
	let server = MockServer::start_async().await;
	let (gateway, store) =
		build_reqwest_test_gateway(test_descriptor(&server.url("/api/")), None, None).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/accounts/staff/login/")
				.header_missing("authorization")
				.form_urlencoded_tuple("username", "mia")
				.form_urlencoded_tuple("password", "hunter2");
			then.status(200).json_body(json!({
				"success": true,
				"access": "A1",
				"refresh": "R1",
				"role": "Manager"
			}));
		})
		.await;
	let login = gateway
		.login(LoginKind::Staff, "mia", "hunter2")
		.await
		.expect("Login should succeed.");

	mock.assert_async().await;

	assert!(login.success);
	assert_eq!(login.extra.get("role"), Some(&json!("Manager")));
	assert_eq!(stored(&store, "access_token").await.as_deref(), Some("A1"));
	assert_eq!(stored(&store, "refresh_token").await.as_deref(), Some("R1"));
	assert!(gateway.session.is_authenticated());
}

#[tokio::test]
async fn rejected_login_leaves_session_untouched() {
	let server = MockServer::start_async().await;
	let (gateway, store) =
		build_reqwest_test_gateway(test_descriptor(&server.url("/api/")), Some("A0"), Some("R0"))
			.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/diner/login/");
			then.status(400).json_body(json!({ "success": false, "error": "Invalid credentials" }));
		})
		.await;

	let err = gateway
		.login(LoginKind::Diner, "ghost", "nope")
		.await
		.expect_err("Invalid credentials should fail.");

	assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
	assert_eq!(err.to_string(), "Invalid credentials");
	assert_eq!(stored(&store, "access_token").await.as_deref(), Some("A0"));
	assert_eq!(stored(&store, "refresh_token").await.as_deref(), Some("R0"));
}

#[tokio::test]
async fn login_without_tokens_is_returned_but_not_stored() {
	let server = MockServer::start_async().await;
	let (gateway, store) =
		build_reqwest_test_gateway(test_descriptor(&server.url("/api/")), None, None).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/diner/login/");
			then.status(200).json_body(json!({ "success": true, "diner_id": 3 }));
		})
		.await;

	let login = gateway
		.login(LoginKind::Diner, "sam", "pw")
		.await
		.expect("Login response should decode.");

	assert!(login.credentials().is_none());
	assert!(store.is_empty());
}

#[tokio::test]
async fn logout_clears_credentials_on_success() {
	let server = MockServer::start_async().await;
	let (gateway, store) =
		build_reqwest_test_gateway(test_descriptor(&server.url("/api/")), Some("A1"), Some("R1"))
			.await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/logout/").header("authorization", "Bearer A1");
			then.status(200).json_body(json!({ "success": true }));
		})
		.await;
	let body = gateway.logout().await.expect("Logout should succeed.");

	mock.assert_async().await;

	assert_eq!(body, json!({ "success": true }));
	assert!(store.is_empty());
	assert!(!gateway.session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_credentials_even_when_server_fails() {
	let server = MockServer::start_async().await;
	let (gateway, store) =
		build_reqwest_test_gateway(test_descriptor(&server.url("/api/")), Some("A1"), Some("R1"))
			.await;
	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/logout/");
			then.status(401).json_body(json!({ "success": false, "error": "Session expired" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/accounts/token/refresh/");
			then.status(200).json_body(json!({ "access": "A2" }));
		})
		.await;
	let err = gateway.logout().await.expect_err("Server failure should still be reported.");

	logout.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(err.to_string(), "Session expired");
	assert!(store.is_empty());
	assert!(!gateway.session.is_authenticated());
}
