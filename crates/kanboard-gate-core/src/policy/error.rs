use thiserror::Error;

/// Errors raised while loading a policy document
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("failed to parse RBAC config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
