//! In-process authentication provider.

mod auth_provider;

pub use auth_provider::{MemoryAuthProvider, MemoryAuthRegistration};
