//! In-process document store.

mod document_store;

pub use document_store::{MemoryDocumentStore, MemoryRegistration, StoreOperation};
