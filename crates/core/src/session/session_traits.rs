use async_trait::async_trait;
use std::sync::Arc;

use super::session_model::Identity;
use crate::documents::ListenerRegistration;
use crate::errors::Result;

/// Callback receiving the new identity (`None` after sign-out).
pub type IdentityListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Contract for the external authentication provider.
///
/// Sign-in and sign-out outcomes reach the session through the identity
/// feed, not through return values. Failures are reported as `Error::Auth`.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers for identity changes. Providers may deliver the current
    /// identity immediately.
    fn on_identity_change(&self, listener: IdentityListener) -> Box<dyn ListenerRegistration>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    async fn sign_out(&self) -> Result<()>;
}
