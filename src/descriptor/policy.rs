// self
use crate::_prelude::*;

/// Decides whether a failed refresh signs the session out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshFailurePolicy {
	/// Clear both tokens only when the refresh endpoint answers and rejects the refresh token.
	///
	/// Transport errors keep the stored credentials so a flaky network does not sign the user
	/// out.
	#[default]
	ClearOnRejection,
	/// Clear both tokens on any refresh failure, including transport errors.
	ClearOnAnyFailure,
}
impl RefreshFailurePolicy {
	/// Returns `true` when a failure of the given kind must clear stored credentials.
	pub fn clears_on(self, transport_failure: bool) -> bool {
		match self {
			Self::ClearOnRejection => !transport_failure,
			Self::ClearOnAnyFailure => true,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rejection_policy_keeps_tokens_on_transport_errors() {
		assert!(RefreshFailurePolicy::ClearOnRejection.clears_on(false));
		assert!(!RefreshFailurePolicy::ClearOnRejection.clears_on(true));
		assert!(RefreshFailurePolicy::ClearOnAnyFailure.clears_on(true));
	}
}
