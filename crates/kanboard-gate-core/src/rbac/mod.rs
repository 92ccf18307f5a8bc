//! Role-based access control for remote procedure calls
//!
//! ```rust,ignore
//! let guard = PermissionGuard::from_settings(&settings, client.clone(), logger)?;
//! guard
//!     .authorize(&cancel, PermissionScope::Project(3), "taskprocedure", "createtask")
//!     .await?;
//! ```

mod context;
mod engine;
mod error;
mod guard;
mod resolver;
mod scope;

pub use context::UserContext;
pub use engine::{RbacEngine, ADMIN_ROLE, APP_ROLE_PRIORITY, BASELINE_APP_ROLE};
pub use error::{AccessError, AccessResult};
pub use guard::PermissionGuard;
pub use resolver::UserContextResolver;
pub use scope::{PermissionScope, ProjectId};
