//! Documents module - wire values and the remote document store contract.

mod documents_model;
mod documents_traits;

pub use documents_model::{FieldValue, RawDocument, RawRecord};
pub use documents_traits::{DocumentStore, ListenerRegistration, SnapshotListener, SnapshotResult};
