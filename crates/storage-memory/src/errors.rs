//! Storage-specific error types for the in-process backends.
//!
//! These errors are internal to this crate and are converted to the
//! transport-agnostic types defined in `goalsync_core` before being returned
//! to callers.

use goalsync_core::errors::{Error, TransportError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Injected fault: {0}")]
    Injected(TransportError),

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    #[error("Notification rejected: {0}")]
    NotificationRejected(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Injected(e) => Error::Transport(e),
            StorageError::AuthRejected(message) => Error::Auth(message),
            StorageError::NotificationRejected(message) => Error::Notification(message),
        }
    }
}

/// Extension trait for converting storage results into core results.
pub trait IntoCore<T> {
    fn into_core(self) -> goalsync_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> goalsync_core::Result<T> {
        self.map_err(Error::from)
    }
}
