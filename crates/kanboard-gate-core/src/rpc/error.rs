//! RPC error taxonomy
//!
//! The retry loop decides on `ErrorKind`, never on rendered text.

use std::time::Duration;

use thiserror::Error;

/// Coarse classification used by the retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failures and per-attempt timeouts
    Transport,
    /// Non-200 HTTP status other than 401/403
    HttpStatus,
    /// Credentials missing/unusable, or the server answered 401/403
    Authorization,
    /// Malformed body, version mismatch, or an `error` member in the envelope
    Protocol,
    /// Request rejected locally before any I/O
    Validation,
    /// `result` did not match the expected schema
    Decoding,
    /// The caller cancelled
    Cancelled,
}

/// Errors that can occur during RPC operations
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("HTTP request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{}", render_http_status(.status, .reason, .body))]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("authentication setup failed: {0}")]
    Authentication(String),

    #[error("remote API error (code {code}): {message}")]
    Remote { code: i64, message: String },

    #[error("malformed JSON-RPC response: {0}")]
    MalformedResponse(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("failed to decode result of {method}: {source}")]
    Decoding {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("API call failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<RpcError>,
    },
}

pub type RpcResult<T> = Result<T, RpcError>;

const FORBIDDEN_GUIDANCE: &str = "Possible causes:\n\
1. Invalid API key or credentials\n\
2. API key doesn't have required permissions\n\
3. User account is disabled or doesn't have access\n\
4. Project access restrictions\n\
\n\
Debug: Enable KANBOARD_DEBUG=true to see detailed auth info";

fn render_http_status(status: &u16, reason: &str, body: &str) -> String {
    if *status == 403 {
        format!("HTTP 403 Forbidden - {}\n{}", body, FORBIDDEN_GUIDANCE)
    } else {
        format!("HTTP {}: {} - {}", status, reason, body)
    }
}

impl RpcError {
    pub fn http_status(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Classify for retry decisions
    ///
    /// 401 and 403 are `Authorization`, so unlike every other non-200
    /// status they are never retried.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::Transport(_) | RpcError::Timeout(_) => ErrorKind::Transport,
            RpcError::HttpStatus { status: 401 | 403, .. } => ErrorKind::Authorization,
            RpcError::HttpStatus { .. } => ErrorKind::HttpStatus,
            RpcError::Authentication(_) => ErrorKind::Authorization,
            RpcError::Remote { .. } | RpcError::MalformedResponse(_) => ErrorKind::Protocol,
            RpcError::Validation(_) => ErrorKind::Validation,
            RpcError::Decoding { .. } => ErrorKind::Decoding,
            RpcError::Cancelled => ErrorKind::Cancelled,
            RpcError::RetriesExhausted { source, .. } => source.kind(),
        }
    }

    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        if let RpcError::RetriesExhausted { .. } = self {
            return false;
        }
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::HttpStatus)
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        RpcError::Transport(e.to_string())
    }
}
