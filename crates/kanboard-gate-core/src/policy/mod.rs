//! Static RBAC policy: roles, hierarchies and per-scope access maps

mod config;
mod error;
mod validate;

pub use config::{
    AccessMap, AccessMapKind, AccessMapsConfig, HierarchiesConfig, Hierarchy, PolicyConfig,
    RoleNames, RolesConfig, EMBEDDED_POLICY, WILDCARD,
};
pub use error::{PolicyError, PolicyResult};
pub use validate::PolicyIssue;
