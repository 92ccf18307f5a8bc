//! Permission decisions over the static policy
//!
//! Algorithm for `check_permission`:
//! 1. pick the access map and the caller's role for the scope
//!    (project: the project role, application: the highest-priority
//!    application role), falling back to the map's `default_role`
//! 2. unknown procedure → deny
//! 3. method entry, else `"*"`, else deny
//! 4. grant when the role equals the requirement or the scope's hierarchy
//!    lists the requirement under the role (one hop only)
//!
//! Checks never fail and never log; missing data resolves to deny or to
//! the scope's default role.

use std::sync::Arc;

use super::context::UserContext;
use super::scope::PermissionScope;
use crate::log_warn;
use crate::logging::Logger;
use crate::policy::{AccessMapKind, PolicyConfig, PolicyResult};

pub const ADMIN_ROLE: &str = "app-admin";

/// Application role assumed when no other source supplies one
pub const BASELINE_APP_ROLE: &str = "app-user";

/// Fixed ranking used to pick the effective application role
///
/// Roles outside this table are never chosen as the highest role.
pub const APP_ROLE_PRIORITY: [(&str, u8); 3] = [("app-admin", 3), ("app-manager", 2), ("app-user", 1)];

#[derive(Debug, Clone)]
pub struct RbacEngine {
    policy: Arc<PolicyConfig>,
}

impl RbacEngine {
    /// Wrap a policy, reporting structural issues as warnings
    pub fn new(policy: PolicyConfig, logger: &dyn Logger) -> Self {
        for issue in policy.validate() {
            log_warn!(logger, "RBAC policy: {}", issue);
        }
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Engine over the policy shipped with the crate
    pub fn embedded(logger: &dyn Logger) -> PolicyResult<Self> {
        Ok(Self::new(PolicyConfig::embedded()?, logger))
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn check_permission(
        &self,
        user: &UserContext,
        scope: PermissionScope,
        procedure: &str,
        method: &str,
    ) -> bool {
        let role = self.effective_role(user, scope);
        self.evaluate(scope.access_map_kind(), role, procedure, method)
    }

    /// Role `check_permission` evaluates for this caller in `scope`
    pub fn effective_role<'a>(&'a self, user: &'a UserContext, scope: PermissionScope) -> &'a str {
        let held = match scope {
            PermissionScope::Project(id) => user.project_role(id).filter(|r| !r.is_empty()),
            PermissionScope::Application => Self::highest_app_role(&user.app_roles),
        };
        held.unwrap_or(self.policy.access_map(scope.access_map_kind()).default_role.as_str())
    }

    /// Decide `role` against one access map
    ///
    /// Procedure and method names are matched case-insensitively.
    pub fn evaluate(&self, kind: AccessMapKind, role: &str, procedure: &str, method: &str) -> bool {
        let procedure = procedure.to_ascii_lowercase();
        let method = method.to_ascii_lowercase();
        match self.policy.access_map(kind).required_role(&procedure, &method) {
            Some(required) => self.has_role(kind, role, required),
            None => false,
        }
    }

    /// `role` is `required` or directly grants it in the hierarchy for `kind`
    pub fn has_role(&self, kind: AccessMapKind, role: &str, required: &str) -> bool {
        if role == required {
            return true;
        }
        self.policy
            .hierarchy(kind)
            .get(role)
            .map_or(false, |granted| granted.iter().any(|r| r == required))
    }

    /// Highest-ranked role in `roles`, if any is ranked
    pub fn highest_app_role(roles: &[String]) -> Option<&str> {
        roles
            .iter()
            .filter_map(|role| {
                APP_ROLE_PRIORITY
                    .iter()
                    .find(|(name, _)| *name == role.as_str())
                    .map(|(_, priority)| (role.as_str(), *priority))
            })
            .max_by_key(|(_, priority)| *priority)
            .map(|(role, _)| role)
    }

    pub fn is_admin(&self, app_roles: &[String]) -> bool {
        Self::highest_app_role(app_roles)
            .map_or(false, |role| self.has_role(AccessMapKind::Api, role, ADMIN_ROLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{MemoryLogger, NoOpLogger};
    use std::collections::BTreeMap;

    fn engine() -> RbacEngine {
        RbacEngine::embedded(&NoOpLogger::new()).unwrap()
    }

    fn app_user(roles: &[&str]) -> UserContext {
        UserContext {
            user_id: 1,
            username: "alice".into(),
            app_roles: roles.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    fn project_user(project_id: i64, role: &str) -> UserContext {
        UserContext {
            user_id: 2,
            username: "bob".into(),
            app_roles: vec!["app-user".into()],
            project_roles: BTreeMap::from([(project_id, role.to_string())]),
            is_admin: false,
        }
    }

    #[test]
    fn test_manager_among_several_roles_can_create_project() {
        let user = app_user(&["app-user", "app-manager"]);
        assert!(engine().check_permission(
            &user,
            PermissionScope::Application,
            "projectprocedure",
            "createproject"
        ));
    }

    #[test]
    fn test_viewer_cannot_create_task() {
        let user = project_user(5, "project-viewer");
        assert!(!engine().check_permission(
            &user,
            PermissionScope::Project(5),
            "taskprocedure",
            "createtask"
        ));
    }

    #[test]
    fn test_unknown_procedure_denied_for_everyone() {
        let engine = engine();
        for role in ["app-admin", "app-manager", "app-user", "app-public"] {
            let user = app_user(&[role]);
            assert!(!engine.check_permission(
                &user,
                PermissionScope::Application,
                "nonexistentprocedure",
                "anything"
            ));
        }
        let manager = project_user(1, "project-manager");
        assert!(!engine.check_permission(&manager, PermissionScope::Project(1), "nonexistentprocedure", "x"));
    }

    #[test]
    fn test_exact_match_needs_no_hierarchy() {
        let policy = PolicyConfig::from_json(
            r#"{
                "roles": {"all_roles": {"auditor": "Auditor"}},
                "hierarchies": {},
                "access_maps": {
                    "api": {"default_role": "auditor", "rules": {"reportprocedure": {"*": "auditor"}}}
                }
            }"#,
        )
        .unwrap();
        let engine = RbacEngine::new(policy, &NoOpLogger::new());
        assert!(engine.evaluate(AccessMapKind::Api, "auditor", "reportprocedure", "getreport"));
        assert!(!engine.evaluate(AccessMapKind::Api, "app-admin", "reportprocedure", "getreport"));
    }

    #[test]
    fn test_hierarchy_single_hop() {
        let engine = engine();
        assert!(engine.has_role(AccessMapKind::ApiProject, "project-manager", "project-viewer"));
        assert!(engine.has_role(AccessMapKind::ApiProject, "project-member", "project-viewer"));
        assert!(!engine.has_role(AccessMapKind::ApiProject, "project-viewer", "project-member"));
        // project roles confer nothing in the application hierarchy
        assert!(!engine.has_role(AccessMapKind::Api, "project-manager", "project-viewer"));
        assert!(engine.has_role(AccessMapKind::Api, "app-admin", "app-manager"));
    }

    #[test]
    fn test_no_transitive_expansion() {
        let policy = PolicyConfig::from_json(
            r#"{
                "roles": {"all_roles": {"a": "", "b": "", "c": ""}},
                "hierarchies": {"application": {"a": ["b"], "b": ["c"]}},
                "access_maps": {"api": {"default_role": "c", "rules": {"p": {"m": "c"}}}}
            }"#,
        )
        .unwrap();
        let engine = RbacEngine::new(policy, &NoOpLogger::new());
        assert!(engine.evaluate(AccessMapKind::Api, "b", "p", "m"));
        assert!(!engine.evaluate(AccessMapKind::Api, "a", "p", "m"));
    }

    #[test]
    fn test_project_default_role() {
        let engine = engine();
        let user = project_user(5, "project-manager");

        // No role in project 9: evaluated as project-viewer, not denied outright.
        assert_eq!(engine.effective_role(&user, PermissionScope::Project(9)), "project-viewer");

        let viewer_only = PolicyConfig::from_json(
            r#"{
                "roles": {"all_roles": {"project-viewer": ""}},
                "hierarchies": {},
                "access_maps": {"api_project": {"default_role": "project-viewer",
                    "rules": {"boardprocedure": {"getboard": "project-viewer"}}}}
            }"#,
        )
        .unwrap();
        let engine = RbacEngine::new(viewer_only, &NoOpLogger::new());
        assert!(engine.check_permission(&user, PermissionScope::Project(9), "boardprocedure", "getboard"));
    }

    #[test]
    fn test_application_default_role() {
        let engine = engine();
        let nobody = app_user(&[]);
        assert_eq!(engine.effective_role(&nobody, PermissionScope::Application), "app-user");

        let unranked = app_user(&["app-public", "custom"]);
        assert_eq!(engine.effective_role(&unranked, PermissionScope::Application), "app-user");
        assert!(!engine.check_permission(&unranked, PermissionScope::Application, "projectprocedure", "createproject"));
    }

    #[test]
    fn test_highest_app_role() {
        let roles = |r: &[&str]| r.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(RbacEngine::highest_app_role(&roles(&["app-user", "app-admin", "app-manager"])), Some("app-admin"));
        assert_eq!(RbacEngine::highest_app_role(&roles(&["app-user", "app-manager"])), Some("app-manager"));
        assert_eq!(RbacEngine::highest_app_role(&roles(&["other", "app-user"])), Some("app-user"));
        assert_eq!(RbacEngine::highest_app_role(&roles(&["other"])), None);
        assert_eq!(RbacEngine::highest_app_role(&[]), None);
    }

    #[test]
    fn test_method_specific_entry_and_wildcard() {
        let engine = engine();
        let admin = app_user(&["app-admin"]);
        let user = app_user(&["app-user"]);

        // userprocedure has only "*": app-admin
        assert!(engine.check_permission(&admin, PermissionScope::Application, "userprocedure", "createuser"));
        assert!(!engine.check_permission(&user, PermissionScope::Application, "userprocedure", "getuser"));

        // projectprocedure lists methods; unlisted ones have no wildcard
        assert!(!engine.check_permission(&admin, PermissionScope::Application, "projectprocedure", "getprojectbyid"));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let user = app_user(&["app-manager"]);
        assert!(engine().check_permission(&user, PermissionScope::Application, "ProjectProcedure", "createProject"));
    }

    #[test]
    fn test_project_scope_role_matrix() {
        let engine = engine();
        let cases = [
            ("project-manager", "projectprocedure", "updateproject", true),
            ("project-member", "projectprocedure", "updateproject", false),
            ("project-member", "commentprocedure", "createcomment", true),
            ("project-manager", "commentprocedure", "createcomment", true),
            ("project-viewer", "commentprocedure", "createcomment", false),
            ("project-manager", "projectpermissionprocedure", "addprojectuser", true),
        ];
        for (role, procedure, method, expected) in cases {
            let user = project_user(3, role);
            assert_eq!(
                engine.check_permission(&user, PermissionScope::Project(3), procedure, method),
                expected,
                "{} {}.{}",
                role,
                procedure,
                method
            );
        }
    }

    #[test]
    fn test_web_controller_maps() {
        let engine = engine();
        assert!(engine.evaluate(AccessMapKind::Application, "app-user", "captchacontroller", "show"));
        assert!(engine.evaluate(AccessMapKind::Project, "project-manager", "actioncontroller", "index"));
        assert!(!engine.evaluate(AccessMapKind::Project, "project-member", "actioncontroller", "index"));
    }

    #[test]
    fn test_is_admin() {
        let engine = engine();
        assert!(engine.is_admin(&["app-user".into(), "app-admin".into()]));
        assert!(!engine.is_admin(&["app-manager".into()]));
        assert!(!engine.is_admin(&[]));
    }

    #[test]
    fn test_policy_issues_logged() {
        let logger = MemoryLogger::new();
        RbacEngine::embedded(&logger).unwrap();
        assert!(logger.contains("RBAC policy: role app-public is not declared"));
    }
}
