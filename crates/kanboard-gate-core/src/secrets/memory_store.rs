//! In-memory secret store

use std::collections::HashMap;

use super::env_store::canonical_key;
use super::traits::SecretStore;

/// In-memory store for tests and embedded callers
///
/// Keys are normalized the same way as `EnvSecretStore`, so a value given
/// as `api_key` is visible through `get("KANBOARD_API_KEY")`.
///
/// # Example
///
/// ```
/// use kanboard_gate_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::with_values([("api_key", "abc123")]);
/// assert_eq!(store.get("KANBOARD_API_KEY"), Some("abc123".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, value)` pairs
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let secrets = values
            .into_iter()
            .map(|(k, v)| (canonical_key(k.as_ref()), v.into()))
            .collect();
        Self { secrets }
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Option<String> {
        self.secrets
            .get(&canonical_key(key))
            .filter(|v| !v.is_empty())
            .cloned()
    }
}
