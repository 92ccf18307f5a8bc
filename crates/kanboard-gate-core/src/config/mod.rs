//! Gateway configuration
//!
//! - `Settings`: endpoint, credentials, RBAC fallbacks and flags, built once
//! - `RequestConfig`: retry/timeout policy for each RPC call

mod error;
mod request;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use request::RequestConfig;
pub use settings::{parse_project_roles, parse_role_list, Settings, PLACEHOLDER_ENDPOINT};
