use std::fmt;

use crate::policy::AccessMapKind;

/// Remote project identifier
pub type ProjectId = i64;

/// Where a permission check applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionScope {
    Application,
    Project(ProjectId),
}

impl PermissionScope {
    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            PermissionScope::Application => None,
            PermissionScope::Project(id) => Some(*id),
        }
    }

    /// Access map that governs remote procedures in this scope
    pub fn access_map_kind(&self) -> AccessMapKind {
        match self {
            PermissionScope::Application => AccessMapKind::Api,
            PermissionScope::Project(_) => AccessMapKind::ApiProject,
        }
    }
}

impl From<Option<ProjectId>> for PermissionScope {
    fn from(project_id: Option<ProjectId>) -> Self {
        project_id.map_or(PermissionScope::Application, PermissionScope::Project)
    }
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionScope::Application => f.write_str("application"),
            PermissionScope::Project(id) => write!(f, "project {}", id),
        }
    }
}
