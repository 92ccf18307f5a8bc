//! Core trait for credential lookup

/// Source of configuration values and credentials
///
/// `Settings` reads every recognized option through this trait, so tests
/// can supply a `MemorySecretStore` instead of mutating the process
/// environment.
///
/// Keys may be given as the full variable name (`KANBOARD_API_KEY`) or as
/// the short alias (`api_key`); stores resolve both.
pub trait SecretStore: Send + Sync {
    /// Retrieve a value by key, `None` if unset or empty
    fn get(&self, key: &str) -> Option<String>;
}
