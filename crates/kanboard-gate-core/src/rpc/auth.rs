//! Authentication scheme selection for outbound requests
//!
//! Priority: a usable API key wins over username/password. The key is
//! presented according to `KANBOARD_AUTH_METHOD`:
//!
//! | mode                    | header                                   |
//! |-------------------------|------------------------------------------|
//! | unset / `global_token`  | `Basic base64("jsonrpc:<key>")`          |
//! | `user_token`            | `Basic base64("<username>:<key>")`       |
//! | `bearer`                | `Bearer <key>`                           |
//!
//! Without a usable key, `Basic base64("<username>:<password>")`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::error::{RpcError, RpcResult};

/// Unset-marker for the API key
pub const PLACEHOLDER_API_KEY: &str = "your-kanboard-api-key";
/// Unset-marker for the username
pub const PLACEHOLDER_USERNAME: &str = "your-kanboard-username";
/// Unset-marker for the password
pub const PLACEHOLDER_PASSWORD: &str = "your-kanboard-password";

/// Fixed Basic-auth user for the application-wide token
const GLOBAL_TOKEN_USER: &str = "jsonrpc";

/// How an API key is presented
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthMethod {
    #[default]
    GlobalToken,
    UserToken,
    Bearer,
    /// Anything else; rejected when a key is actually used
    Unsupported(String),
}

impl From<String> for AuthMethod {
    fn from(raw: String) -> Self {
        AuthMethod::parse(&raw)
    }
}

impl From<AuthMethod> for String {
    fn from(method: AuthMethod) -> Self {
        method.as_str().to_string()
    }
}

impl AuthMethod {
    /// Parse the raw mode selector (case-insensitive, trimmed, empty = default)
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "global_token" => AuthMethod::GlobalToken,
            "user_token" => AuthMethod::UserToken,
            "bearer" => AuthMethod::Bearer,
            other => AuthMethod::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AuthMethod::GlobalToken => "global_token",
            AuthMethod::UserToken => "user_token",
            AuthMethod::Bearer => "bearer",
            AuthMethod::Unsupported(raw) => raw,
        }
    }
}

/// The scheme chosen for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    Basic { username: String, password: String },
    Bearer(String),
}

impl AuthScheme {
    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        match self {
            AuthScheme::Basic { username, password } => {
                let raw = format!("{}:{}", username, password);
                format!("Basic {}", STANDARD.encode(raw))
            }
            AuthScheme::Bearer(token) => format!("Bearer {}", token),
        }
    }

    /// Short description safe for logs
    pub fn describe(&self) -> String {
        match self {
            AuthScheme::Basic { username, .. } if username == GLOBAL_TOKEN_USER => {
                "global API token auth (jsonrpc:token)".to_string()
            }
            AuthScheme::Basic { username, .. } => format!("basic auth ({})", username),
            AuthScheme::Bearer(_) => "bearer token auth".to_string(),
        }
    }
}

/// Credentials available to the client
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub auth_method: AuthMethod,
}

impl Credentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: key.into(),
            ..Default::default()
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = method;
        self
    }

    pub fn has_valid_api_key(&self) -> bool {
        is_set(&self.api_key, PLACEHOLDER_API_KEY)
    }

    pub fn has_valid_username(&self) -> bool {
        is_set(&self.username, PLACEHOLDER_USERNAME)
    }

    pub fn has_valid_login(&self) -> bool {
        self.has_valid_username() && is_set(&self.password, PLACEHOLDER_PASSWORD)
    }

    /// Pick the scheme for the next request
    pub fn scheme(&self) -> RpcResult<AuthScheme> {
        if self.has_valid_api_key() {
            return match &self.auth_method {
                AuthMethod::GlobalToken => Ok(AuthScheme::Basic {
                    username: GLOBAL_TOKEN_USER.to_string(),
                    password: self.api_key.clone(),
                }),
                AuthMethod::UserToken => {
                    if !self.has_valid_username() {
                        return Err(RpcError::Authentication(
                            "KANBOARD_AUTH_METHOD=user_token requires KANBOARD_USERNAME to be set"
                                .to_string(),
                        ));
                    }
                    Ok(AuthScheme::Basic {
                        username: self.username.clone(),
                        password: self.api_key.clone(),
                    })
                }
                AuthMethod::Bearer => Ok(AuthScheme::Bearer(self.api_key.clone())),
                AuthMethod::Unsupported(raw) => Err(RpcError::Authentication(format!(
                    "unsupported KANBOARD_AUTH_METHOD: {} (supported: global_token, user_token, bearer)",
                    raw
                ))),
            };
        }

        if self.has_valid_login() {
            return Ok(AuthScheme::Basic {
                username: self.username.clone(),
                password: self.password.clone(),
            });
        }

        Err(RpcError::Authentication(
            "no valid authentication credentials provided".to_string(),
        ))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("username", &self.username)
            .field("password", &mask_password(&self.password))
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

fn is_set(value: &str, placeholder: &str) -> bool {
    !value.is_empty() && value != placeholder
}

/// Render an API key for diagnostics
pub fn mask_api_key(key: &str) -> String {
    if key.is_empty() || key == PLACEHOLDER_API_KEY {
        return key.to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Render a password for diagnostics
pub fn mask_password(password: &str) -> String {
    if password.is_empty() || password == PLACEHOLDER_PASSWORD {
        return password.to_string();
    }
    "*".repeat(password.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
    }

    #[test]
    fn test_global_token_default() {
        let creds = Credentials::api_key("secret-token");
        let scheme = creds.scheme().unwrap();
        assert_eq!(scheme.header_value(), basic("jsonrpc", "secret-token"));
        assert_eq!(scheme.header_value(), "Basic anNvbnJwYzpzZWNyZXQtdG9rZW4=");
    }

    #[test]
    fn test_user_token_requires_username() {
        let creds = Credentials::api_key("tok").with_method(AuthMethod::UserToken);
        let err = creds.scheme().unwrap_err();
        assert!(err.to_string().contains("requires KANBOARD_USERNAME"));

        let placeholder = creds.clone().with_username(PLACEHOLDER_USERNAME);
        assert!(placeholder.scheme().is_err());

        let ok = creds.with_username("alice");
        assert_eq!(ok.scheme().unwrap().header_value(), basic("alice", "tok"));
    }

    #[test]
    fn test_bearer() {
        let creds = Credentials::api_key("tok").with_method(AuthMethod::Bearer);
        assert_eq!(creds.scheme().unwrap().header_value(), "Bearer tok");
    }

    #[test]
    fn test_unsupported_mode_only_matters_with_key() {
        let creds = Credentials::api_key("tok").with_method(AuthMethod::parse("digest"));
        let err = creds.scheme().unwrap_err();
        assert!(err.to_string().contains("unsupported KANBOARD_AUTH_METHOD: digest"));

        let login = Credentials::basic("bob", "pw").with_method(AuthMethod::parse("digest"));
        assert_eq!(login.scheme().unwrap().header_value(), basic("bob", "pw"));
    }

    #[test]
    fn test_placeholder_key_falls_back_to_login() {
        let creds = Credentials {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            username: "bob".to_string(),
            password: "pw".to_string(),
            auth_method: AuthMethod::Bearer,
        };
        assert_eq!(creds.scheme().unwrap(), AuthScheme::Basic {
            username: "bob".into(),
            password: "pw".into(),
        });
    }

    #[test]
    fn test_no_credentials() {
        let creds = Credentials::basic(PLACEHOLDER_USERNAME, PLACEHOLDER_PASSWORD);
        let err = creds.scheme().unwrap_err();
        assert_eq!(err.to_string(), "authentication setup failed: no valid authentication credentials provided");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_auth_method() {
        assert_eq!(AuthMethod::parse(""), AuthMethod::GlobalToken);
        assert_eq!(AuthMethod::parse("  User_Token "), AuthMethod::UserToken);
        assert_eq!(AuthMethod::parse("BEARER"), AuthMethod::Bearer);
        assert_eq!(AuthMethod::parse("oauth"), AuthMethod::Unsupported("oauth".into()));
    }

    #[test]
    fn test_masking() {
        assert_eq!(mask_api_key(""), "");
        assert_eq!(mask_api_key(PLACEHOLDER_API_KEY), PLACEHOLDER_API_KEY);
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("abcd1234efgh"), "abcd****efgh");
        assert_eq!(mask_password("hunter2"), "*******");
        assert_eq!(mask_password(PLACEHOLDER_PASSWORD), PLACEHOLDER_PASSWORD);

        let debug = format!("{:?}", Credentials::api_key("abcd1234efgh"));
        assert!(!debug.contains("1234"));
    }
}
