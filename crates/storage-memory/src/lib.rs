//! In-process backends for Goalsync.
//!
//! This crate implements the collaborator traits defined in `goalsync-core`
//! without any external service:
//! - `MemoryDocumentStore`: collections of raw records with live snapshot
//!   subscriptions
//! - `MemoryAuthProvider`: email/password accounts and an identity feed
//! - `MemoryNotificationCenter`: pending one-shot reminders
//!
//! Each backend accepts injected faults so callers can exercise failure
//! paths.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-memory (this crate)
//! ```

pub mod auth;
pub mod documents;
pub mod errors;
pub mod notifications;

pub use auth::MemoryAuthProvider;
pub use documents::{MemoryDocumentStore, StoreOperation};
pub use errors::{IntoCore, StorageError};
pub use notifications::MemoryNotificationCenter;

// Re-export from goalsync-core for convenience
pub use goalsync_core::errors::{Error, Result, TransportError};
