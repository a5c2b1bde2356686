//! Menu endpoints. Reads are public; edits require a manager session.

// self
use crate::{_prelude::*, gateway::Gateway, http::HttpTransport, request::ApiRequest};

const MENUS: &str = "menu/menus/";
const MENU_ITEMS: &str = "menu/menu-items/";
const ADD_MENU_ITEMS: &str = "menu/items/add/";
const REMOVE_MENU_ITEMS: &str = "menu/items/remove/";

/// Menu item to create.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewMenuItem {
	/// Item name.
	pub name: String,
	/// Unit price.
	pub price: f64,
	/// Optional description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Menu the item belongs to.
	pub menu_id: u64,
}

#[derive(Serialize)]
struct ItemsPayload<'a> {
	items: &'a [NewMenuItem],
}

#[derive(Serialize)]
struct ItemIdsPayload<'a> {
	item_ids: &'a [u64],
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every menu.
	pub async fn list_menus(&self) -> Result<Value> {
		self.issue(ApiRequest::get(MENUS)).await
	}

	/// Fetches one menu.
	pub async fn menu(&self, menu_id: u64) -> Result<Value> {
		self.issue(ApiRequest::get(format!("{MENUS}{menu_id}/"))).await
	}

	/// Lists every menu item.
	pub async fn list_menu_items(&self) -> Result<Value> {
		self.issue(ApiRequest::get(MENU_ITEMS)).await
	}

	/// Fetches one menu item.
	pub async fn menu_item(&self, item_id: u64) -> Result<Value> {
		self.issue(ApiRequest::get(format!("{MENU_ITEMS}{item_id}/"))).await
	}

	/// Lists the items of one menu.
	pub async fn filter_menu_items(&self, menu_id: u64) -> Result<Value> {
		self.issue(ApiRequest::get(MENU_ITEMS).query("menu_id", menu_id)).await
	}

	/// Adds items to the menu.
	pub async fn add_menu_items(&self, items: &[NewMenuItem]) -> Result<Value> {
		let request = ApiRequest::post(ADD_MENU_ITEMS).json(&ItemsPayload { items })?.protected();

		self.issue(request).await
	}

	/// Removes items from the menu.
	pub async fn remove_menu_items(&self, item_ids: &[u64]) -> Result<Value> {
		let request =
			ApiRequest::post(REMOVE_MENU_ITEMS).json(&ItemIdsPayload { item_ids })?.protected();

		self.issue(request).await
	}
}
