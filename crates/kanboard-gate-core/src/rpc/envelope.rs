//! JSON-RPC 2.0 envelope types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{RpcError, RpcResult};

pub const JSONRPC_VERSION: &str = "2.0";

/// Outbound request body
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub id: u64,
    pub params: &'a Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, id: u64, params: &'a Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            id,
            params,
        }
    }
}

/// `error` member of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Inbound response body
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Parse a response body
    pub fn from_slice(body: &[u8]) -> RpcResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| RpcError::MalformedResponse(format!("failed to decode API response: {}", e)))
    }

    /// True if the peer echoed `id`
    pub fn matches_id(&self, id: u64) -> bool {
        match &self.id {
            Some(Value::Number(n)) => n.as_u64() == Some(id),
            Some(Value::String(s)) => s.parse::<u64>().ok() == Some(id),
            _ => false,
        }
    }

    /// Collapse into the `result` value or the error it carries
    ///
    /// A populated `error` takes precedence over a version mismatch.
    pub fn into_result(self) -> RpcResult<Value> {
        if let Some(err) = self.error {
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            });
        }
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(RpcError::MalformedResponse(format!(
                "invalid JSON-RPC version: {:?}",
                self.jsonrpc
            )));
        }
        Ok(self.result)
    }
}
