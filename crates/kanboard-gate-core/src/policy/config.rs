//! Policy document types
//!
//! Loaded once, never mutated. Procedure and method keys are lower-case
//! remote-API identifiers; `"*"` in a procedure's rules applies to every
//! method not listed explicitly.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::PolicyResult;

/// The policy shipped with the crate
pub const EMBEDDED_POLICY: &str = include_str!("rbac_policy.json");

/// Method key matching any method of a procedure
pub const WILDCARD: &str = "*";

/// role-id -> roles it implicitly grants (one hop, no closure)
pub type Hierarchy = BTreeMap<String, Vec<String>>;

/// role-id -> display name
pub type RoleNames = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesConfig {
    #[serde(default)]
    pub application_roles: RoleNames,
    #[serde(default)]
    pub project_roles: RoleNames,
    #[serde(default)]
    pub all_roles: RoleNames,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchiesConfig {
    #[serde(default)]
    pub application: Hierarchy,
    #[serde(default)]
    pub project: Hierarchy,
}

/// Procedure/method -> required role for one scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessMap {
    /// Role of any caller with no explicit role in this scope
    pub default_role: String,
    #[serde(default)]
    pub rules: BTreeMap<String, BTreeMap<String, String>>,
}

impl AccessMap {
    /// Role required for `procedure.method`, or `None` when nothing matches
    ///
    /// An explicit method entry wins over the wildcard.
    pub fn required_role(&self, procedure: &str, method: &str) -> Option<&str> {
        let methods = self.rules.get(procedure)?;
        methods
            .get(method)
            .or_else(|| methods.get(WILDCARD))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessMapsConfig {
    /// Web controllers scoped to a project
    #[serde(default)]
    pub project: AccessMap,
    /// Web controllers at application level
    #[serde(default)]
    pub application: AccessMap,
    /// JSON-RPC procedures at application level
    #[serde(default)]
    pub api: AccessMap,
    /// JSON-RPC procedures scoped to a project
    #[serde(default)]
    pub api_project: AccessMap,
}

/// Selector for one of the four access maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMapKind {
    Project,
    Application,
    Api,
    ApiProject,
}

impl AccessMapKind {
    pub const ALL: [AccessMapKind; 4] = [
        AccessMapKind::Project,
        AccessMapKind::Application,
        AccessMapKind::Api,
        AccessMapKind::ApiProject,
    ];

    /// Key of this map in the policy document
    pub fn name(self) -> &'static str {
        match self {
            AccessMapKind::Project => "project",
            AccessMapKind::Application => "application",
            AccessMapKind::Api => "api",
            AccessMapKind::ApiProject => "api_project",
        }
    }

    /// Whether roles in this map come from the project hierarchy
    pub fn is_project_scoped(self) -> bool {
        matches!(self, AccessMapKind::Project | AccessMapKind::ApiProject)
    }
}

impl fmt::Display for AccessMapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete policy document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub roles: RolesConfig,
    pub hierarchies: HierarchiesConfig,
    pub access_maps: AccessMapsConfig,
}

impl PolicyConfig {
    /// Parse the document shipped with the crate
    pub fn embedded() -> PolicyResult<Self> {
        Self::from_json(EMBEDDED_POLICY)
    }

    pub fn from_json(json: &str) -> PolicyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn access_map(&self, kind: AccessMapKind) -> &AccessMap {
        match kind {
            AccessMapKind::Project => &self.access_maps.project,
            AccessMapKind::Application => &self.access_maps.application,
            AccessMapKind::Api => &self.access_maps.api,
            AccessMapKind::ApiProject => &self.access_maps.api_project,
        }
    }

    /// Hierarchy that applies to roles of `kind`
    pub fn hierarchy(&self, kind: AccessMapKind) -> &Hierarchy {
        if kind.is_project_scoped() {
            &self.hierarchies.project
        } else {
            &self.hierarchies.application
        }
    }

    pub fn is_known_role(&self, role: &str) -> bool {
        self.roles.all_roles.contains_key(role)
    }
}
