//! Credential pair and the storage keys it is persisted under.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access/refresh token pair issued at login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived bearer token attached to authenticated calls.
	pub access: TokenSecret,
	/// Long-lived token exchanged at the refresh endpoint.
	pub refresh: TokenSecret,
}
impl CredentialPair {
	/// Creates a pair from raw token strings.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access: access.into(), refresh: refresh.into() }
	}
}

/// Errors raised while validating [`StorageKeys`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StorageKeysError {
	/// A key was empty or whitespace.
	#[error("The {which} storage key must not be empty.")]
	Empty {
		/// Which key failed validation.
		which: &'static str,
	},
	/// Both tokens would be written to the same slot.
	#[error("Access and refresh storage keys must differ, both are `{key}`.")]
	Collision {
		/// Shared key value.
		key: String,
	},
}

/// Fixed, distinct keys addressing the two persisted token values.
///
/// Construction always goes through [`StorageKeys::new`], deserialization included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStorageKeys")]
pub struct StorageKeys {
	access: String,
	refresh: String,
}
impl StorageKeys {
	/// Default key for the access token.
	pub const DEFAULT_ACCESS: &'static str = "access_token";
	/// Default key for the refresh token.
	pub const DEFAULT_REFRESH: &'static str = "refresh_token";

	/// Creates a validated key pair.
	pub fn new(
		access: impl Into<String>,
		refresh: impl Into<String>,
	) -> Result<Self, StorageKeysError> {
		let keys = Self { access: access.into(), refresh: refresh.into() };

		if keys.access.trim().is_empty() {
			return Err(StorageKeysError::Empty { which: "access" });
		}
		if keys.refresh.trim().is_empty() {
			return Err(StorageKeysError::Empty { which: "refresh" });
		}
		if keys.access == keys.refresh {
			return Err(StorageKeysError::Collision { key: keys.access });
		}

		Ok(keys)
	}

	/// Key holding the access token.
	pub fn access(&self) -> &str {
		&self.access
	}

	/// Key holding the refresh token.
	pub fn refresh(&self) -> &str {
		&self.refresh
	}
}
impl Default for StorageKeys {
	fn default() -> Self {
		Self { access: Self::DEFAULT_ACCESS.into(), refresh: Self::DEFAULT_REFRESH.into() }
	}
}

impl TryFrom<RawStorageKeys> for StorageKeys {
	type Error = StorageKeysError;

	fn try_from(raw: RawStorageKeys) -> Result<Self, Self::Error> {
		Self::new(raw.access, raw.refresh)
	}
}

#[derive(Deserialize)]
struct RawStorageKeys {
	access: String,
	refresh: String,
}
