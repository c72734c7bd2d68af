//! Core error types for the goal sync layer.
//!
//! This module defines transport-agnostic error types. Collaborator adapters
//! (document stores, auth providers, notification centers) convert their own
//! failures into these types at the trait boundary.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the sync core.
///
/// Every variant renders as user-visible text, because remote failures end
/// up in the engine's `last_error` field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("You need to sign in to add a goal")]
    NotAuthenticated,

    #[error("Remote store error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid goal record: {0}")]
    Decode(#[from] DecodeError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Transport-agnostic error type for remote document store operations.
///
/// Uses `String` details so concrete stores can map their native errors
/// without leaking client types into the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the caller's credentials or rules.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The addressed document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The operation exceeded its deadline.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Reasons a raw document cannot be decoded into a `Goal`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("document {document_id}: required field '{field}' is missing")]
    MissingField {
        document_id: String,
        field: &'static str,
    },

    #[error("document {document_id}: field '{field}' is not a {expected}")]
    WrongType {
        document_id: String,
        field: &'static str,
        expected: &'static str,
    },
}

/// Validation errors for caller-submitted input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
