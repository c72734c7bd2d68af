//! Session module - authenticated identity and its effect on sync lifecycle.

mod session_model;
mod session_service;
mod session_traits;

pub use session_model::{Identity, SharedIdentity};
pub use session_service::SessionManager;
pub use session_traits::{AuthProvider, IdentityListener};
