//! Typed wrappers over the restaurant API's endpoints.
//!
//! Each submodule extends [`Gateway`](crate::gateway::Gateway) with the calls of one API area.
//! Protected endpoints are sent with the bearer token and replayed once after a refresh; the
//! public menu reads carry no credentials. Responses with a known shape decode into the types
//! below, everything else is returned as [`Value`].

pub mod accounts;
pub mod analytics;
pub mod menu;
pub mod orders;
pub mod reviews;

pub use accounts::*;
pub use analytics::*;
pub use menu::*;
pub use orders::*;
pub use reviews::*;

// self
use crate::_prelude::*;

/// Account role recognized by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
	/// Restaurant manager; may administer accounts and the menu.
	Manager,
	/// Floor or kitchen staff.
	Staff,
	/// Diner.
	Customer,
}
impl Role {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Manager => "Manager",
			Role::Staff => "Staff",
			Role::Customer => "Customer",
		}
	}

	/// Returns `true` for roles that log in through the staff endpoint.
	pub const fn is_staff(self) -> bool {
		matches!(self, Role::Manager | Role::Staff)
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Generic `{status, message}` acknowledgement returned by mutating endpoints.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StatusResponse {
	/// `"success"` or `"error"`.
	pub status: String,
	/// Human-readable outcome.
	#[serde(default)]
	pub message: Option<String>,
	/// Any other fields the server included.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, Value>,
}
impl StatusResponse {
	/// Returns `true` when the server reported success.
	pub fn is_success(&self) -> bool {
		self.status.eq_ignore_ascii_case("success")
	}
}
