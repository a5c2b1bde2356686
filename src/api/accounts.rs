//! Account endpoints: the current user, diner profiles, and manager administration.
//!
//! Login, logout, and refresh live on the gateway itself because they own the session.

// self
use crate::{
	_prelude::*,
	api::{Role, StatusResponse},
	gateway::Gateway,
	http::HttpTransport,
	request::ApiRequest,
};

const USER_INFO: &str = "accounts/protected/";
const DINER_INFO: &str = "accounts/diner/info/";
const UPDATE_USER: &str = "accounts/user/update/";
const ADD_ACCOUNTS: &str = "accounts/manager/add/";
const DELETE_ACCOUNTS: &str = "accounts/manager/remove/";
const UPDATE_ROLES: &str = "accounts/manager/update_role/";

/// Identity of the logged-in user.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserInfo {
	/// Whether the session is valid.
	#[serde(default)]
	pub success: bool,
	/// Greeting returned by the server.
	#[serde(default)]
	pub message: Option<String>,
	/// Set when the user logged in as staff or manager.
	#[serde(default)]
	pub staff_id: Option<u64>,
	/// Set when the user logged in as a diner.
	#[serde(default)]
	pub diner_id: Option<u64>,
	/// Role of the user.
	pub role: Role,
}
impl UserInfo {
	/// Returns the user id regardless of which login produced it.
	pub fn user_id(&self) -> Option<u64> {
		self.staff_id.or(self.diner_id)
	}
}

/// Envelope returned by the diner info endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DinerInfoResponse {
	/// `"success"` or `"error"`.
	pub status: String,
	/// Diner profile.
	pub diner_info: DinerInfo,
}

/// Diner profile.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DinerInfo {
	/// Diner id.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Email address.
	#[serde(default)]
	pub email: Option<String>,
	/// Phone number.
	#[serde(default)]
	pub phone_number: Option<String>,
}

/// Partial profile update; unset fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserUpdate {
	/// New display name.
	pub name: Option<String>,
	/// New email address.
	pub email: Option<String>,
	/// New phone number.
	pub phone_num: Option<String>,
	/// New password.
	pub password: Option<String>,
}

/// Account to create through the manager endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewAccount {
	/// Display name, also the login username.
	pub name: String,
	/// Email address.
	pub email: String,
	/// Phone number.
	pub phone_num: String,
	/// Role granted to the account.
	pub role: Role,
	/// Initial password.
	pub password: String,
}

/// Role change for one user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoleUpdate {
	/// User to update.
	pub user_id: u64,
	/// Role to assign.
	pub new_role: Role,
}

#[derive(Serialize)]
struct AccountsPayload<'a> {
	accounts: &'a [NewAccount],
}

#[derive(Serialize)]
struct UserIdsPayload<'a> {
	user_ids: &'a [u64],
}

#[derive(Serialize)]
struct RoleUpdatesPayload<'a> {
	updates: &'a [RoleUpdate],
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Fetches the identity of the logged-in user.
	pub async fn user_info(&self) -> Result<UserInfo> {
		self.issue_as(ApiRequest::get(USER_INFO).protected()).await
	}

	/// Fetches a diner's profile.
	pub async fn diner_info(&self, diner_id: u64) -> Result<DinerInfoResponse> {
		self.issue_as(ApiRequest::get(DINER_INFO).query("diner_id", diner_id).protected()).await
	}

	/// Updates a user's profile; only the fields set in `update` are sent.
	pub async fn update_user(&self, user_id: u64, update: &UserUpdate) -> Result<StatusResponse> {
		let request = ApiRequest::post(UPDATE_USER)
			.form_field("user_id", user_id)
			.optional_form_field("name", update.name.as_deref())
			.optional_form_field("email", update.email.as_deref())
			.optional_form_field("phone_num", update.phone_num.as_deref())
			.optional_form_field("password", update.password.as_deref())
			.protected();

		self.issue_as(request).await
	}

	/// Creates accounts in bulk.
	pub async fn add_accounts(&self, accounts: &[NewAccount]) -> Result<Value> {
		let request =
			ApiRequest::post(ADD_ACCOUNTS).json(&AccountsPayload { accounts })?.protected();

		self.issue(request).await
	}

	/// Deletes accounts by id.
	pub async fn delete_accounts(&self, user_ids: &[u64]) -> Result<Value> {
		let request =
			ApiRequest::post(DELETE_ACCOUNTS).json(&UserIdsPayload { user_ids })?.protected();

		self.issue(request).await
	}

	/// Changes the roles of existing users.
	pub async fn update_roles(&self, updates: &[RoleUpdate]) -> Result<Value> {
		let request =
			ApiRequest::post(UPDATE_ROLES).json(&RoleUpdatesPayload { updates })?.protected();

		self.issue(request).await
	}
}
