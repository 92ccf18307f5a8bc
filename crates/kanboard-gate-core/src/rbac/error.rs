use thiserror::Error;

use super::scope::PermissionScope;
use crate::policy::PolicyError;
use crate::rpc::RpcError;

/// Why a gated call may not proceed
#[derive(Error, Debug)]
pub enum AccessError {
    #[error(
        "access denied: insufficient permissions for {procedure}.{method} (user: {username}, app roles: [{}]{})",
        .app_roles.join(" "),
        scope_note(.scope, .project_role)
    )]
    Denied {
        procedure: String,
        method: String,
        username: String,
        app_roles: Vec<String>,
        scope: PermissionScope,
        project_role: Option<String>,
    },

    #[error("failed to get user context: {0}")]
    Resolution(#[source] RpcError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

pub type AccessResult<T> = Result<T, AccessError>;

fn scope_note(scope: &PermissionScope, project_role: &Option<String>) -> String {
    match (scope, project_role) {
        (PermissionScope::Application, _) => String::new(),
        (PermissionScope::Project(_), Some(role)) => format!(" (project role: {})", role),
        (PermissionScope::Project(_), None) => " (no project role assigned)".to_string(),
    }
}
