//! Builds a `UserContext` for the authenticated caller
//!
//! Live data comes first: `getMe` for identity and application role,
//! `getMyProjects` for per-project roles. Configured fallbacks only fill
//! what the live calls left empty. A failed `getMe` fails resolution; a
//! failed `getMyProjects` just means no live project roles.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::context::UserContext;
use super::engine::{RbacEngine, BASELINE_APP_ROLE};
use super::error::{AccessError, AccessResult};
use super::scope::ProjectId;
use crate::api::{get_me, get_my_projects};
use crate::config::Settings;
use crate::logging::SharedLogger;
use crate::rpc::{RpcCaller, RpcError};
use crate::types::CancellationToken;
use crate::log_debug;

pub struct UserContextResolver {
    caller: Arc<dyn RpcCaller>,
    engine: RbacEngine,
    fallback_app_roles: Vec<String>,
    fallback_project_roles: BTreeMap<ProjectId, String>,
    logger: SharedLogger,
}

impl UserContextResolver {
    pub fn new(
        caller: Arc<dyn RpcCaller>,
        engine: RbacEngine,
        settings: &Settings,
        logger: SharedLogger,
    ) -> Self {
        Self {
            caller,
            engine,
            fallback_app_roles: settings.fallback_app_roles.clone(),
            fallback_project_roles: settings.fallback_project_roles.clone(),
            logger,
        }
    }

    pub async fn resolve(&self, cancel: &CancellationToken) -> AccessResult<UserContext> {
        let me = get_me(self.caller.as_ref(), cancel)
            .await
            .map_err(AccessError::Resolution)?;

        let app_roles = match me.role.as_deref() {
            Some(role) => {
                log_debug!(self.logger, "Got role from API: {}", role);
                clean_roles(vec![role.to_string()])
            }
            None => {
                log_debug!(self.logger, "No role in getMe response, using configured application roles");
                self.fallback_app_roles()
            }
        };

        let mut project_roles = self.live_project_roles(cancel).await?;
        for (project_id, role) in &self.fallback_project_roles {
            project_roles
                .entry(*project_id)
                .or_insert_with(|| role.clone());
        }

        let is_admin = self.engine.is_admin(&app_roles);
        Ok(UserContext {
            user_id: me.id,
            username: me.username().to_string(),
            app_roles,
            project_roles,
            is_admin,
        })
    }

    fn fallback_app_roles(&self) -> Vec<String> {
        let roles = clean_roles(self.fallback_app_roles.clone());
        if roles.is_empty() {
            vec![BASELINE_APP_ROLE.to_string()]
        } else {
            roles
        }
    }

    async fn live_project_roles(
        &self,
        cancel: &CancellationToken,
    ) -> AccessResult<BTreeMap<ProjectId, String>> {
        let mut roles = BTreeMap::new();
        let projects = match get_my_projects(self.caller.as_ref(), cancel).await {
            Ok(projects) => projects,
            Err(RpcError::Cancelled) => return Err(AccessError::Resolution(RpcError::Cancelled)),
            Err(e) => {
                log_debug!(self.logger, "Failed to get user projects: {}", e);
                return Ok(roles);
            }
        };

        log_debug!(self.logger, "Found {} projects in getMyProjects response", projects.len());
        for project in projects {
            match (project.id, project.role) {
                (Some(id), Some(role)) => {
                    log_debug!(self.logger, "Project {} has role: {}", id, role);
                    roles.insert(id, role);
                }
                (Some(id), None) => log_debug!(self.logger, "Project {} has no role field", id),
                (None, _) => {}
            }
        }
        Ok(roles)
    }
}

fn clean_roles(roles: Vec<String>) -> Vec<String> {
    roles
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}
