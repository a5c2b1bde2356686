//! Order endpoints for diners and staff.

// self
use crate::{_prelude::*, gateway::Gateway, http::HttpTransport, request::ApiRequest};

const SUBMIT: &str = "orders/submit/";
const ORDER: &str = "orders/get_order/";
const BILL: &str = "orders/get_bill/";
const STATUS: &str = "orders/status/";
const DINER_ORDERS: &str = "orders/diner/";
const ALL_ORDERS: &str = "orders/all/";
const KITCHEN_ORDERS: &str = "orders/kitchen/";
const ADD_ITEM: &str = "orders/items/add/";
const REMOVE_ITEM: &str = "orders/items/remove/";
const ADD_NOTE: &str = "orders/note/add/";
const CHOOSE_SERVICE: &str = "orders/service/choose/";
const UPDATE: &str = "orders/update/";
const UPDATE_STATUS: &str = "orders/status/update/";
const PAY: &str = "orders/pay/";

/// Lifecycle state of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Submitted, not yet started.
	Pending,
	/// In the kitchen.
	Preparing,
	/// Ready to serve or collect.
	Ready,
	/// Served and closed.
	Completed,
	/// Cancelled before completion.
	Cancelled,
}
impl OrderStatus {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			OrderStatus::Pending => "PENDING",
			OrderStatus::Preparing => "PREPARING",
			OrderStatus::Ready => "READY",
			OrderStatus::Completed => "COMPLETED",
			OrderStatus::Cancelled => "CANCELLED",
		}
	}
}
impl Display for OrderStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How an order is paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
	/// Paid at the counter.
	Cash,
	/// Paid by bank transfer.
	OnlineBanking,
}
impl PaymentMethod {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			PaymentMethod::Cash => "CASH",
			PaymentMethod::OnlineBanking => "ONLINE_BANKING",
		}
	}
}
impl Display for PaymentMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Service type label chosen for an order, such as dine-in or takeaway.
///
/// The server accepts free-form labels, so this is a transparent string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceType(String);
impl ServiceType {
	/// Wraps a service type label.
	pub fn new(label: impl Into<String>) -> Self {
		Self(label.into())
	}

	/// Returns the label.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for ServiceType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<&str> for ServiceType {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// One line of an order: a menu item and how many of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderLine {
	/// Menu item id.
	pub item_id: u64,
	/// Quantity ordered.
	pub quantity: u32,
}

/// Order to submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrder {
	/// Diner placing the order.
	pub diner_id: u64,
	/// Service type label.
	pub service_type: ServiceType,
	/// Ordered items.
	pub lines: Vec<OrderLine>,
	/// Optional note for the kitchen.
	pub note: Option<String>,
}

/// Replacement contents for an existing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderUpdate {
	/// New item lines.
	pub lines: Vec<OrderLine>,
	/// Optional replacement note.
	pub note: Option<String>,
}

#[derive(Serialize)]
struct SubmitPayload<'a> {
	diner_id: u64,
	service_type: &'a ServiceType,
	ordered_items: Vec<u64>,
	quantities: Vec<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	note: Option<&'a str>,
}
impl<'a> From<&'a NewOrder> for SubmitPayload<'a> {
	fn from(order: &'a NewOrder) -> Self {
		Self {
			diner_id: order.diner_id,
			service_type: &order.service_type,
			ordered_items: order.lines.iter().map(|line| line.item_id).collect(),
			quantities: order.lines.iter().map(|line| line.quantity).collect(),
			note: order.note.as_deref(),
		}
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Submits a new order.
	pub async fn submit_order(&self, order: &NewOrder) -> Result<Value> {
		self.issue(ApiRequest::post(SUBMIT).json(&SubmitPayload::from(order))?.protected()).await
	}

	/// Fetches one order.
	pub async fn order(&self, order_id: u64) -> Result<Value> {
		self.issue(by_order(ApiRequest::get(ORDER), order_id)).await
	}

	/// Fetches the bill of one order.
	pub async fn bill(&self, order_id: u64) -> Result<Value> {
		self.issue(by_order(ApiRequest::get(BILL), order_id)).await
	}

	/// Fetches the status of one order.
	pub async fn order_status(&self, order_id: u64) -> Result<Value> {
		self.issue(by_order(ApiRequest::get(STATUS), order_id)).await
	}

	/// Lists the orders of one diner.
	pub async fn diner_orders(&self, diner_id: u64) -> Result<Value> {
		self.issue(ApiRequest::get(DINER_ORDERS).query("diner_id", diner_id).protected()).await
	}

	/// Lists every order; staff only.
	pub async fn all_orders(&self) -> Result<Value> {
		self.issue(ApiRequest::get(ALL_ORDERS).protected()).await
	}

	/// Lists the orders the kitchen still has to prepare; staff only.
	pub async fn kitchen_orders(&self) -> Result<Value> {
		self.issue(ApiRequest::get(KITCHEN_ORDERS).protected()).await
	}

	/// Adds `quantity` of an item to an order.
	pub async fn add_order_item(&self, order_id: u64, line: OrderLine) -> Result<Value> {
		self.issue(line_form(ApiRequest::post(ADD_ITEM), order_id, line)).await
	}

	/// Removes `quantity` of an item from an order.
	pub async fn remove_order_item(&self, order_id: u64, line: OrderLine) -> Result<Value> {
		self.issue(line_form(ApiRequest::post(REMOVE_ITEM), order_id, line)).await
	}

	/// Attaches a note to an order.
	pub async fn add_note(&self, order_id: u64, note: &str) -> Result<Value> {
		let request = ApiRequest::post(ADD_NOTE)
			.form_field("order_id", order_id)
			.form_field("note", note)
			.protected();

		self.issue(request).await
	}

	/// Sets the service type of an order.
	pub async fn choose_service(&self, order_id: u64, service_type: &ServiceType) -> Result<Value> {
		let request = ApiRequest::post(CHOOSE_SERVICE)
			.form_field("order_id", order_id)
			.form_field("service_type", service_type)
			.protected();

		self.issue(request).await
	}

	/// Replaces the items of an order.
	///
	/// Item ids and quantities are sent as repeated `item_ids` and `quantities` form fields in
	/// line order.
	pub async fn update_order(&self, order_id: u64, update: &OrderUpdate) -> Result<Value> {
		let request = ApiRequest::post(UPDATE)
			.form_field("order_id", order_id)
			.repeated_form_field("item_ids", update.lines.iter().map(|line| line.item_id))
			.repeated_form_field("quantities", update.lines.iter().map(|line| line.quantity))
			.optional_form_field("note", update.note.as_deref().filter(|note| !note.is_empty()))
			.protected();

		self.issue(request).await
	}

	/// Moves an order to a new status; staff only.
	pub async fn update_order_status(&self, order_id: u64, status: OrderStatus) -> Result<Value> {
		let request = ApiRequest::post(UPDATE_STATUS)
			.form_field("order_id", order_id)
			.form_field("status", status)
			.protected();

		self.issue(request).await
	}

	/// Records payment for an order.
	pub async fn process_payment(&self, order_id: u64, method: PaymentMethod) -> Result<Value> {
		let request = ApiRequest::post(PAY)
			.form_field("order_id", order_id)
			.form_field("payment_method", method)
			.protected();

		self.issue(request).await
	}
}

fn by_order(request: ApiRequest, order_id: u64) -> ApiRequest {
	request.query("order_id", order_id).protected()
}

fn line_form(request: ApiRequest, order_id: u64, line: OrderLine) -> ApiRequest {
	request
		.form_field("order_id", order_id)
		.form_field("item_id", line.item_id)
		.form_field("quantity", line.quantity)
		.protected()
}
