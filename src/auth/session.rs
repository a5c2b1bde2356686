//! Owned session state mirroring the persisted credential pair.
//!
//! A [`Session`] is created once per signed-in user (or anonymous visitor) and injected into the
//! gateway. It caches the two tokens in memory and writes every mutation through to the backing
//! [`CredentialStore`] so a later [`Session::init`] over the same store resumes the session.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, StorageKeys, TokenSecret},
	store::CredentialStore,
};

/// Point-in-time copy of the session's tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
	/// Current access token, if any.
	pub access: Option<TokenSecret>,
	/// Current refresh token, if any.
	pub refresh: Option<TokenSecret>,
}

/// Credential state shared by every call issued through one gateway.
pub struct Session {
	store: Arc<dyn CredentialStore>,
	keys: StorageKeys,
	state: RwLock<SessionState>,
}
impl Session {
	/// Opens a session over `store`, loading any tokens already persisted under `keys`.
	pub async fn init(store: Arc<dyn CredentialStore>, keys: StorageKeys) -> Result<Self> {
		let session = Self { store, keys, state: RwLock::new(SessionState::default()) };

		session.reload().await?;

		Ok(session)
	}

	/// Re-reads both tokens from the backing store and replaces the cached state.
	pub async fn reload(&self) -> Result<SessionState> {
		let access = self.store.get(self.keys.access()).await?.map(TokenSecret::from);
		let refresh = self.store.get(self.keys.refresh()).await?.map(TokenSecret::from);
		let state = SessionState { access, refresh };

		*self.state.write() = state.clone();

		Ok(state)
	}

	/// Storage keys this session persists under.
	pub fn keys(&self) -> &StorageKeys {
		&self.keys
	}

	/// Returns the cached access token.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.state.read().access.clone()
	}

	/// Returns the cached refresh token.
	pub fn refresh_token(&self) -> Option<TokenSecret> {
		self.state.read().refresh.clone()
	}

	/// Returns both tokens when the session holds a complete pair.
	pub fn credentials(&self) -> Option<CredentialPair> {
		let state = self.state.read();

		match (&state.access, &state.refresh) {
			(Some(access), Some(refresh)) =>
				Some(CredentialPair { access: access.clone(), refresh: refresh.clone() }),
			_ => None,
		}
	}

	/// Returns a copy of the cached state.
	pub fn snapshot(&self) -> SessionState {
		self.state.read().clone()
	}

	/// Returns `true` when an access token is present.
	pub fn is_authenticated(&self) -> bool {
		self.state.read().access.is_some()
	}

	/// Persists a freshly issued pair: access first, then refresh.
	///
	/// The two writes are not atomic; both values are only consumed together once this
	/// returns.
	pub async fn store_pair(&self, pair: CredentialPair) -> Result<()> {
		self.store.set(self.keys.access(), pair.access.expose()).await?;
		self.store.set(self.keys.refresh(), pair.refresh.expose()).await?;

		let mut state = self.state.write();

		state.access = Some(pair.access);
		state.refresh = Some(pair.refresh);

		Ok(())
	}

	/// Overwrites the access token, leaving the refresh token untouched.
	pub async fn replace_access(&self, access: TokenSecret) -> Result<()> {
		self.store.set(self.keys.access(), access.expose()).await?;

		self.state.write().access = Some(access);

		Ok(())
	}

	/// Removes both tokens.
	///
	/// The in-memory state is cleared before the store is touched, so the session reads as
	/// signed out even if the store reports an error.
	pub async fn clear(&self) -> Result<()> {
		*self.state.write() = SessionState::default();

		let access = self.store.remove(self.keys.access()).await;
		let refresh = self.store.remove(self.keys.refresh()).await;

		access?;
		refresh?;

		Ok(())
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.read();

		f.debug_struct("Session")
			.field("keys", &self.keys)
			.field("access_set", &state.access.is_some())
			.field("refresh_set", &state.refresh.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::store::MemoryStore;

	fn runtime() -> Runtime {
		Runtime::new().expect("Failed to build Tokio runtime for session tests.")
	}

	#[test]
	fn init_loads_persisted_pair() {
		let rt = runtime();
		let store = Arc::new(MemoryStore::default());
		let keys = StorageKeys::default();

		rt.block_on(async {
			store.set(keys.access(), "A1").await.expect("Seeding access token should succeed.");
			store.set(keys.refresh(), "R1").await.expect("Seeding refresh token should succeed.");

			let session = Session::init(store.clone(), keys.clone())
				.await
				.expect("Session should initialize from a seeded store.");
			let pair = session.credentials().expect("Seeded session should hold a full pair.");

			assert_eq!(pair, CredentialPair::new("A1", "R1"));
			assert!(session.is_authenticated());
		});
	}

	#[test]
	fn replace_access_keeps_refresh_token() {
		let rt = runtime();
		let store = Arc::new(MemoryStore::default());
		let keys = StorageKeys::default();

		rt.block_on(async {
			let session = Session::init(store.clone(), keys.clone())
				.await
				.expect("Session should initialize from an empty store.");

			session
				.store_pair(CredentialPair::new("A1", "R1"))
				.await
				.expect("Storing the login pair should succeed.");
			session.replace_access("A2".into()).await.expect("First rotation should succeed.");
			session.replace_access("A3".into()).await.expect("Second rotation should succeed.");

			assert_eq!(session.access_token(), Some(TokenSecret::from("A3")));
			assert_eq!(session.refresh_token(), Some(TokenSecret::from("R1")));
			assert_eq!(
				store.get(keys.refresh()).await.expect("Reading refresh token should succeed."),
				Some("R1".into())
			);
		});
	}

	#[test]
	fn clear_removes_both_keys() {
		let rt = runtime();
		let store = Arc::new(MemoryStore::default());
		let keys = StorageKeys::default();

		rt.block_on(async {
			let session = Session::init(store.clone(), keys.clone())
				.await
				.expect("Session should initialize from an empty store.");

			session
				.store_pair(CredentialPair::new("A1", "R1"))
				.await
				.expect("Storing the login pair should succeed.");
			session.clear().await.expect("Clearing the session should succeed.");

			assert_eq!(session.snapshot(), SessionState::default());
			assert_eq!(store.get(keys.access()).await.expect("Read should succeed."), None);
			assert_eq!(store.get(keys.refresh()).await.expect("Read should succeed."), None);
		});
	}
}
