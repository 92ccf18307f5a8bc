//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Short aliases for the recognized `KANBOARD_*` variables
static KEY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("endpoint", "KANBOARD_API_ENDPOINT");
    m.insert("api_key", "KANBOARD_API_KEY");
    m.insert("username", "KANBOARD_USERNAME");
    m.insert("password", "KANBOARD_PASSWORD");
    m.insert("auth_method", "KANBOARD_AUTH_METHOD");
    m.insert("skip_rbac", "KANBOARD_SKIP_RBAC");
    m.insert("debug", "KANBOARD_DEBUG");
    m.insert("app_roles", "KANBOARD_USER_APP_ROLES");
    m.insert("project_roles", "KANBOARD_USER_PROJECT_ROLES");
    m
});

/// Canonical variable name for a key or alias
pub(crate) fn canonical_key(key: &str) -> String {
    KEY_ALIASES
        .get(key.to_lowercase().as_str())
        .map(|k| k.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Secret store that reads from environment variables
///
/// Empty variables are treated as unset.
///
/// # Example
///
/// ```
/// use kanboard_gate_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
///
/// // Both resolve KANBOARD_API_KEY
/// let a = store.get("api_key");
/// let b = store.get("KANBOARD_API_KEY");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, key: &str) -> Option<String> {
        env::var(canonical_key(key)).ok().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("api_key"), "KANBOARD_API_KEY");
        assert_eq!(canonical_key("Project_Roles"), "KANBOARD_USER_PROJECT_ROLES");
        assert_eq!(canonical_key("SOME_OTHER_VAR"), "SOME_OTHER_VAR");
    }

    #[test]
    fn test_env_store_get_direct() {
        env::set_var("KANBOARD_GATE_TEST_ONLY_VAR", "direct");
        let store = EnvSecretStore::new();
        assert_eq!(store.get("KANBOARD_GATE_TEST_ONLY_VAR"), Some("direct".to_string()));
        env::remove_var("KANBOARD_GATE_TEST_ONLY_VAR");

        assert_eq!(store.get("KANBOARD_GATE_TEST_ONLY_VAR"), None);
    }

    #[test]
    fn test_env_store_empty_is_unset() {
        env::set_var("KANBOARD_GATE_TEST_EMPTY", "");
        let store = EnvSecretStore::new();
        assert_eq!(store.get("KANBOARD_GATE_TEST_EMPTY"), None);
        env::remove_var("KANBOARD_GATE_TEST_EMPTY");
    }
}
