//! Remote document store contract.
//!
//! The store is an external collaborator: the core only depends on these
//! traits, never on a concrete client.

use async_trait::async_trait;
use std::sync::Arc;

use super::documents_model::{RawDocument, RawRecord};
use crate::errors::{Result, TransportError};

/// Payload delivered to a live subscriber: the full collection or an error.
pub type SnapshotResult = std::result::Result<Vec<RawDocument>, TransportError>;

/// Callback invoked for every snapshot of a subscribed collection.
///
/// May be called from any thread, at any time relative to writes.
pub type SnapshotListener = Arc<dyn Fn(SnapshotResult) + Send + Sync>;

/// Handle for a live registration (snapshot subscription, identity feed).
///
/// Releasing stops further callbacks. Releasing twice must be harmless.
pub trait ListenerRegistration: Send + Sync {
    fn release(&self);
}

/// Trait defining the contract for a remote, multi-writer document store.
///
/// Concurrent writers are resolved by the store as last-write-wins at the
/// document level.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Opens a live subscription to every document of `collection`.
    fn subscribe(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> Result<Box<dyn ListenerRegistration>>;

    /// Creates a new document and returns its store-assigned id.
    async fn add_document(&self, collection: &str, record: RawRecord) -> Result<String>;

    /// Overwrites (or creates) the document keyed by `id`.
    async fn set_document(&self, collection: &str, id: &str, record: RawRecord) -> Result<()>;

    /// Removes the document keyed by `id`.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;
}
