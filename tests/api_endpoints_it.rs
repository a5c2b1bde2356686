#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::macros::date;
// self
use restaurant_gateway::{
	_preludet::*,
	api::{
		DateRange, NewAccount, NewFeedback, OrderStatus, PaymentMethod, Role, RoleUpdate,
		UserUpdate,
	},
};

async fn signed_in(server: &MockServer) -> ReqwestTestGateway {
	let (gateway, _store) =
		build_reqwest_test_gateway(test_descriptor(&server.url("/api/")), Some("A1"), Some("R1"))
			.await;

	gateway
}

#[tokio::test]
async fn public_menu_reads_never_carry_credentials() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let menus = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/menu/menus/").header_missing("authorization");
			then.status(200).json_body(json!([{ "id": 1, "name": "Lunch" }]));
		})
		.await;
	let filtered = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/menu/menu-items/")
				.query_param("menu_id", "1")
				.header_missing("authorization");
			then.status(200).json_body(json!([{ "id": 10, "name": "Pho" }]));
		})
		.await;
	let item = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/menu/menu-items/10/").header_missing("authorization");
			then.status(200).json_body(json!({ "id": 10, "name": "Pho" }));
		})
		.await;

	assert_eq!(gateway.list_menus().await.expect("Menus should load.")[0]["name"], "Lunch");
	assert_eq!(gateway.filter_menu_items(1).await.expect("Items should load.")[0]["id"], 10);
	assert_eq!(gateway.menu_item(10).await.expect("Item should load.")["name"], "Pho");

	menus.assert_async().await;
	filtered.assert_async().await;
	item.assert_async().await;
}

#[tokio::test]
async fn diner_info_decodes_profile() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/accounts/diner/info/")
				.query_param("diner_id", "3")
				.header("authorization", "Bearer A1");
			then.status(200).json_body(json!({
				"status": "success",
				"diner_info": {
					"id": 3,
					"name": "sam",
					"email": "sam@example.com",
					"phone_number": "0411111111"
				}
			}));
		})
		.await;
	let info = gateway.diner_info(3).await?;

	mock.assert_async().await;

	assert_eq!(info.diner_info.name, "sam");
	assert_eq!(info.diner_info.phone_number.as_deref(), Some("0411111111"));

	Ok(())
}

#[tokio::test]
async fn mismatched_body_reports_decode_path() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/accounts/protected/");
			then.status(200).json_body(json!({ "success": true, "role": "Chef" }));
		})
		.await;

	let err = gateway.user_info().await.expect_err("Unknown role should fail to decode.");

	assert!(matches!(err, Error::Decode(_)));
	assert!(err.to_string().contains("`role`"));
	assert_eq!(err.status(), Some(StatusCode::OK));
}

#[tokio::test]
async fn update_user_only_sends_set_fields() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/accounts/user/update/")
				.form_urlencoded_tuple("user_id", "5")
				.form_urlencoded_tuple("email", "new@example.com");
			then.status(200).json_body(json!({
				"status": "success",
				"message": "User updated",
				"user": { "id": 5, "name": "mia", "email": "new@example.com", "phone_num": "" }
			}));
		})
		.await;
	let update = UserUpdate { email: Some("new@example.com".into()), ..Default::default() };
	let response = gateway.update_user(5, &update).await.expect("Update should succeed.");

	mock.assert_async().await;

	assert!(response.is_success());
	assert_eq!(response.extra["user"]["email"], "new@example.com");
}

#[tokio::test]
async fn manager_endpoints_send_json_payloads() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let add = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/accounts/manager/add/")
				.header("content-type", "application/json")
				.json_body(json!({
					"accounts": [{
						"name": "lee",
						"email": "lee@example.com",
						"phone_num": "0422222222",
						"role": "Staff",
						"password": "pw"
					}]
				}));
			then.status(201).json_body(json!({ "status": "success", "user_id": 8 }));
		})
		.await;
	let roles = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/accounts/manager/update_role/")
				.json_body(json!({ "updates": [{ "user_id": 8, "new_role": "Manager" }] }));
			then.status(200).json_body(json!({ "status": "success" }));
		})
		.await;
	let account = NewAccount {
		name: "lee".into(),
		email: "lee@example.com".into(),
		phone_num: "0422222222".into(),
		role: Role::Staff,
		password: "pw".into(),
	};

	let created = gateway.add_accounts(&[account]).await.expect("Account creation should succeed.");

	assert_eq!(created["user_id"], 8);

	gateway
		.update_roles(&[RoleUpdate { user_id: 8, new_role: Role::Manager }])
		.await
		.expect("Role update should succeed.");

	add.assert_async().await;
	roles.assert_async().await;
}

#[tokio::test]
async fn order_status_and_payment_use_wire_labels() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let status = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/orders/status/update/")
				.form_urlencoded_tuple("order_id", "42")
				.form_urlencoded_tuple("status", "READY");
			then.status(200).json_body(json!({ "status": "success" }));
		})
		.await;
	let pay = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/orders/pay/")
				.form_urlencoded_tuple("order_id", "42")
				.form_urlencoded_tuple("payment_method", "ONLINE_BANKING");
			then.status(200).json_body(json!({ "status": "success" }));
		})
		.await;

	gateway
		.update_order_status(42, OrderStatus::Ready)
		.await
		.expect("Status update should succeed.");
	gateway
		.process_payment(42, PaymentMethod::OnlineBanking)
		.await
		.expect("Payment should succeed.");

	status.assert_async().await;
	pay.assert_async().await;
}

#[tokio::test]
async fn feedback_and_analytics_round_trip() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let feedback = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/reviews/feedbacks/")
				.json_body(json!({ "order": 42, "rating": 5 }));
			then.status(201).json_body(json!({ "id": 1, "order": 42, "rating": 5 }));
		})
		.await;
	let revenue = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/analytics/revenue/")
				.query_param("start", "2025-01-01")
				.query_param("end", "2025-01-31")
				.header("authorization", "Bearer A1");
			then.status(200).json_body(json!({ "total_revenue": 1234.5 }));
		})
		.await;

	gateway
		.submit_feedback(&NewFeedback { order: 42, rating: 5, comment: None })
		.await
		.expect("Feedback should be accepted.");

	let range = DateRange::new(date!(2025 - 01 - 01), date!(2025 - 01 - 31))
		.expect("Range should be valid.");
	let report = gateway.revenue(range).await.expect("Revenue should load.");

	feedback.assert_async().await;
	revenue.assert_async().await;

	assert_eq!(report["total_revenue"], 1234.5);
}
