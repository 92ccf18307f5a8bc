//! Single entry point for gating a remote call

use std::sync::Arc;

use super::engine::RbacEngine;
use super::error::{AccessError, AccessResult};
use super::resolver::UserContextResolver;
use super::scope::PermissionScope;
use crate::config::Settings;
use crate::logging::SharedLogger;
use crate::rpc::RpcCaller;
use crate::types::CancellationToken;
use crate::{log_debug, log_warn};

/// Resolves the caller and checks one procedure/method against the policy
pub struct PermissionGuard {
    engine: RbacEngine,
    resolver: UserContextResolver,
    skip_rbac: bool,
    logger: SharedLogger,
}

impl PermissionGuard {
    pub fn new(
        engine: RbacEngine,
        resolver: UserContextResolver,
        settings: &Settings,
        logger: SharedLogger,
    ) -> Self {
        if settings.skip_rbac {
            log_warn!(logger, "KANBOARD_SKIP_RBAC is set: permission checks are disabled");
        }
        Self {
            engine,
            resolver,
            skip_rbac: settings.skip_rbac,
            logger,
        }
    }

    /// Guard over the embedded policy, resolving identity through `caller`
    pub fn from_settings(
        settings: &Settings,
        caller: Arc<dyn RpcCaller>,
        logger: SharedLogger,
    ) -> AccessResult<Self> {
        let engine = RbacEngine::embedded(logger.as_ref())?;
        let resolver = UserContextResolver::new(caller, engine.clone(), settings, logger.clone());
        Ok(Self::new(engine, resolver, settings, logger))
    }

    pub fn engine(&self) -> &RbacEngine {
        &self.engine
    }

    pub fn resolver(&self) -> &UserContextResolver {
        &self.resolver
    }

    /// Allow or deny `procedure.method` for the current caller in `scope`
    pub async fn authorize(
        &self,
        cancel: &CancellationToken,
        scope: PermissionScope,
        procedure: &str,
        method: &str,
    ) -> AccessResult<()> {
        if self.skip_rbac {
            return Ok(());
        }

        let user = self.resolver.resolve(cancel).await?;

        log_debug!(
            self.logger,
            "User {} (ID: {}) roles: app={:?}, project={:?}",
            user.username,
            user.user_id,
            user.app_roles,
            user.project_roles
        );
        log_debug!(self.logger, "Checking permission for {}.{} ({})", procedure, method, scope);

        if self.engine.check_permission(&user, scope, procedure, method) {
            return Ok(());
        }

        let project_role = scope
            .project_id()
            .and_then(|id| user.project_role(id))
            .map(String::from);
        Err(AccessError::Denied {
            procedure: procedure.to_string(),
            method: method.to_string(),
            username: user.username,
            app_roles: user.app_roles,
            scope,
            project_role,
        })
    }
}
