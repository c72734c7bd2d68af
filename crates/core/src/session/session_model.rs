//! Session domain models.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::utils::observable::Observable;

/// An authenticated user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable user id; written as `createdBy` on new goals.
    pub uid: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Current identity, shared between the session manager (writer) and the
/// sync engine (reader). `None` means signed out.
pub type SharedIdentity = Arc<Observable<Option<Identity>>>;
