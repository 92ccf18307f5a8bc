//! Kanboard Gate Core
//!
//! Gating layer for a tool gateway in front of a Kanboard JSON-RPC API.
//! Two contracts are exposed to the gateway's handlers:
//!
//! - `PermissionGuard::authorize(..)`: resolve the caller and decide a
//!   procedure/method against the static RBAC policy
//! - `RpcCaller::call(..)`: execute a JSON-RPC call with auth, per-attempt
//!   timeout, bounded retries and cancellation
//!
//! ```rust,ignore
//! use kanboard_gate_core::{CancellationToken, PermissionGuard, PermissionScope, RpcCaller, RpcClient, Settings};
//!
//! let settings = Settings::load()?;
//! let logger = settings.logger();
//! let client = Arc::new(RpcClient::new(&settings, logger.clone())?);
//! let guard = PermissionGuard::from_settings(&settings, client.clone(), logger)?;
//!
//! let cancel = CancellationToken::new();
//! guard.authorize(&cancel, PermissionScope::Project(3), "taskprocedure", "createtask").await?;
//! let task_id = client.call(&cancel, "createTask", json!({"project_id": 3, "title": "x"})).await?;
//! ```

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod policy;
pub mod rpc;
pub mod api;
pub mod rbac;

// Re-export commonly used types
pub use types::CancellationToken;

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};

pub use logging::{ConsoleLogger, Logger, MemoryLogger, NoOpLogger, SharedLogger};

pub use config::{ConfigError, ConfigResult, RequestConfig, Settings};

pub use policy::{AccessMap, AccessMapKind, PolicyConfig, PolicyError, PolicyIssue};

pub use rpc::{
    AuthMethod, Credentials, ErrorKind, MockRpcCaller, RpcCaller, RpcClient, RpcError, RpcResult,
};

pub use api::{Me, MyProject};

pub use rbac::{
    AccessError, AccessResult, PermissionGuard, PermissionScope, ProjectId, RbacEngine,
    UserContext, UserContextResolver,
};
