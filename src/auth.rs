//! Session-domain credential models and the owned session state.

pub mod credentials;
pub mod secret;
pub mod session;

pub use credentials::*;
pub use secret::*;
pub use session::*;
