//! Session lifecycle calls: login and logout.

// self
use crate::{
	_prelude::*,
	auth::CredentialPair,
	gateway::{Gateway, response},
	http::HttpTransport,
	obs::{self, CallKind},
	request::ApiRequest,
};

/// Which login endpoint to authenticate against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginKind {
	/// Staff and managers.
	Staff,
	/// Diners (customers).
	Diner,
}
impl LoginKind {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginKind::Staff => "staff",
			LoginKind::Diner => "diner",
		}
	}
}
impl Display for LoginKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Body returned by the login endpoints.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
	/// Whether the server accepted the credentials.
	#[serde(default)]
	pub success: bool,
	/// Access token issued on success.
	#[serde(default)]
	pub access: Option<String>,
	/// Refresh token issued on success.
	#[serde(default)]
	pub refresh: Option<String>,
	/// Any other fields the server included.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, Value>,
}
impl LoginResponse {
	/// Returns the issued pair when the login succeeded and both tokens are present.
	pub fn credentials(&self) -> Option<CredentialPair> {
		match (self.success, &self.access, &self.refresh) {
			(true, Some(access), Some(refresh)) =>
				Some(CredentialPair::new(access.as_str(), refresh.as_str())),
			_ => None,
		}
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Logs in with a username and password, storing the issued pair on success.
	///
	/// A 2xx response without `success: true` and both tokens is returned as-is and leaves the
	/// session untouched.
	pub async fn login(
		&self,
		kind: LoginKind,
		username: &str,
		password: &str,
	) -> Result<LoginResponse> {
		let path = match kind {
			LoginKind::Staff => self.descriptor.endpoints.staff_login.as_str(),
			LoginKind::Diner => self.descriptor.endpoints.diner_login.as_str(),
		};
		let request = ApiRequest::post(path)
			.form_field("username", username)
			.form_field("password", password);
		let raw = self.execute(CallKind::Login, kind.as_str(), &request).await?;
		let login: LoginResponse = response::decode_typed(&request.path, &raw)?;

		if let Some(pair) = login.credentials() {
			self.session.store_pair(pair).await?;
			self.refresh_gate.reset();
		}

		Ok(login)
	}

	/// Logs out and removes both stored tokens, whatever the server answers.
	///
	/// The logout call carries the bearer token but is never refreshed or replayed. The
	/// server's failure, if any, is still returned after the credentials are cleared. A store
	/// that fails to remove them takes precedence: its [`Error::Storage`] is returned and the
	/// server's failure is only traced.
	pub async fn logout(&self) -> Result<Value> {
		let request = ApiRequest::post(self.descriptor.endpoints.logout.as_str()).authenticated();
		let result = self
			.execute(CallKind::Logout, "logout", &request)
			.await
			.and_then(|raw| response::decode_value(&request.path, &raw));
		let cleared = self.session.clear().await;

		self.refresh_gate.reset();

		if let Err(cleared) = cleared {
			if let Err(err) = &result {
				obs::trace_event(CallKind::Logout, "logout call failed", err.status());
			}

			return Err(cleared);
		}

		result
	}
}
