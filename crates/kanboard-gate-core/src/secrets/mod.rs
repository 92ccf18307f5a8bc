//! Credential and option lookup
//!
//! - `SecretStore` trait for pluggable sources
//! - `EnvSecretStore`: process environment (`KANBOARD_*` variables)
//! - `MemorySecretStore`: in-memory, for tests and embedding

mod traits;
mod env_store;
mod memory_store;

pub use traits::SecretStore;
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
