//! Typed result schemas for the remote procedures the core calls itself

mod identity;

pub use identity::{get_me, get_my_projects, Me, MyProject, GET_ME, GET_MY_PROJECTS};
