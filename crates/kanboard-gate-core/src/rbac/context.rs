use std::collections::BTreeMap;

use serde::Serialize;

use super::scope::ProjectId;

/// Who is calling and which roles they hold
///
/// Built fresh for every check and never mutated afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserContext {
    pub user_id: i64,
    pub username: String,
    /// Application-scope roles; may hold several
    pub app_roles: Vec<String>,
    /// At most one role per project
    pub project_roles: BTreeMap<ProjectId, String>,
    /// Derived from `app_roles` at resolution time
    pub is_admin: bool,
}

impl UserContext {
    pub fn project_role(&self, project_id: ProjectId) -> Option<&str> {
        self.project_roles.get(&project_id).map(String::as_str)
    }
}
