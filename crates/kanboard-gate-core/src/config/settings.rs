//! Gateway settings, built once at startup
//!
//! Sources, later overriding earlier:
//! 1. built-in defaults (placeholders for endpoint and credentials)
//! 2. optional YAML file (`<config_dir>/kanboard-gate/config.yaml`)
//! 3. a `SecretStore`, normally the process environment (`KANBOARD_*`)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::request::RequestConfig;
use crate::logging::{ConsoleLogger, Logger, SharedLogger};
use crate::rbac::ProjectId;
use crate::rpc::{mask_api_key, mask_password, AuthMethod, Credentials};
use crate::rpc::{PLACEHOLDER_API_KEY, PLACEHOLDER_PASSWORD, PLACEHOLDER_USERNAME};
use crate::secrets::{EnvSecretStore, SecretStore};

/// Endpoint used when nothing is configured
pub const PLACEHOLDER_ENDPOINT: &str = "https://your-kanboard-url/jsonrpc.php";

/// Immutable configuration handed to every component constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON-RPC endpoint URL
    pub endpoint: String,
    pub credentials: Credentials,
    /// Skip permission checks entirely (diagnostics only)
    pub skip_rbac: bool,
    /// Verbose diagnostics
    pub debug: bool,
    /// Application roles used when the identity call reports none
    pub fallback_app_roles: Vec<String>,
    /// Project roles used for projects the live call did not report
    pub fallback_project_roles: BTreeMap<ProjectId, String>,
    pub request: RequestConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: PLACEHOLDER_ENDPOINT.to_string(),
            credentials: Credentials {
                api_key: PLACEHOLDER_API_KEY.to_string(),
                username: PLACEHOLDER_USERNAME.to_string(),
                password: PLACEHOLDER_PASSWORD.to_string(),
                auth_method: AuthMethod::GlobalToken,
            },
            skip_rbac: false,
            debug: false,
            fallback_app_roles: Vec::new(),
            fallback_project_roles: BTreeMap::new(),
            request: RequestConfig::default(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_store(&EnvSecretStore::new())
    }

    /// Defaults overlaid with `store`
    pub fn from_store(store: &dyn SecretStore) -> ConfigResult<Self> {
        Self::default().merge_store(store)
    }

    /// Overlay every key `store` defines
    pub fn merge_store(mut self, store: &dyn SecretStore) -> ConfigResult<Self> {
        if let Some(v) = store.get("endpoint") {
            self.endpoint = v;
        }
        if let Some(v) = store.get("api_key") {
            self.credentials.api_key = v;
        }
        if let Some(v) = store.get("username") {
            self.credentials.username = v;
        }
        if let Some(v) = store.get("password") {
            self.credentials.password = v;
        }
        if let Some(v) = store.get("auth_method") {
            self.credentials.auth_method = AuthMethod::parse(&v);
        }
        if let Some(v) = store.get("skip_rbac") {
            self.skip_rbac = parse_flag(&v);
        }
        if let Some(v) = store.get("debug") {
            self.debug = parse_flag(&v);
        }
        if let Some(v) = store.get("app_roles") {
            self.fallback_app_roles = parse_role_list(&v);
        }
        if let Some(v) = store.get("project_roles") {
            self.fallback_project_roles = parse_project_roles(&v);
        }
        self.validate()?;
        Ok(self)
    }

    /// Load a YAML settings file; a missing file yields defaults
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// User-level file, then the environment on top
    pub fn load() -> ConfigResult<Self> {
        Self::load_file(Self::user_file_path())?.merge_store(&EnvSecretStore::new())
    }

    /// `<config_dir>/kanboard-gate/config.yaml`
    pub fn user_file_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("kanboard-gate").join("config.yaml")
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// The logger selected by the diagnostics flag
    pub fn logger(&self) -> SharedLogger {
        Arc::new(ConsoleLogger::verbose(self.debug))
    }

    /// Emit the effective configuration at debug level, secrets masked
    pub fn describe(&self, logger: &dyn Logger) {
        let creds = &self.credentials;
        logger.debug("Settings loaded:");
        logger.debug(&format!("KANBOARD_API_ENDPOINT={}", self.endpoint));
        logger.debug(&format!(
            "KANBOARD_API_KEY={} (length: {})",
            mask_api_key(&creds.api_key),
            creds.api_key.len()
        ));
        logger.debug(&format!("KANBOARD_USERNAME={}", creds.username));
        logger.debug(&format!(
            "KANBOARD_PASSWORD={} (length: {})",
            mask_password(&creds.password),
            creds.password.len()
        ));
        logger.debug(&format!("KANBOARD_AUTH_METHOD={}", creds.auth_method.as_str()));
        logger.debug(&format!(
            "skip_rbac={} fallback_app_roles={:?} fallback_project_roles={:?}",
            self.skip_rbac, self.fallback_app_roles, self.fallback_project_roles
        ));
    }

    fn validate(&self) -> ConfigResult<()> {
        reqwest::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

fn parse_flag(raw: &str) -> bool {
    let v = raw.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

/// `"app-user, app-manager"` → `["app-user", "app-manager"]`, blanks dropped
pub fn parse_role_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// `"3:project-manager,7:project-viewer"` → `{3: .., 7: ..}`
///
/// Malformed pairs are skipped. The first entry for an id wins.
pub fn parse_project_roles(raw: &str) -> BTreeMap<ProjectId, String> {
    let mut roles = BTreeMap::new();
    for pair in raw.split(',') {
        let parts: Vec<&str> = pair.trim().split(':').collect();
        if parts.len() != 2 {
            continue;
        }
        let role = parts[1].trim();
        if role.is_empty() {
            continue;
        }
        if let Ok(id) = parts[0].trim().parse::<ProjectId>() {
            roles.entry(id).or_insert_with(|| role.to_string());
        }
    }
    roles
}
