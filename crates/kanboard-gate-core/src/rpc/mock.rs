//! Scripted `RpcCaller` for testing
//!
//! Answers from a fixed table without any network I/O. Methods with no
//! scripted reply get the JSON-RPC "Method not found" error.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::client::RpcCaller;
use super::error::{RpcError, RpcResult};
use crate::types::CancellationToken;

/// Scripted reply for one method
#[derive(Debug, Clone)]
pub enum MockReply {
    Result(Value),
    Remote { code: i64, message: String },
    Transport(String),
}

impl MockReply {
    fn to_result(&self) -> RpcResult<Value> {
        match self {
            MockReply::Result(value) => Ok(value.clone()),
            MockReply::Remote { code, message } => Err(RpcError::Remote {
                code: *code,
                message: message.clone(),
            }),
            MockReply::Transport(message) => Err(RpcError::Transport(message.clone())),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockRpcCaller {
    replies: HashMap<String, MockReply>,
    calls: Mutex<Vec<String>>,
}

impl MockRpcCaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, method: &str, value: Value) -> Self {
        self.replies.insert(method.to_string(), MockReply::Result(value));
        self
    }

    pub fn with_remote_error(mut self, method: &str, code: i64, message: &str) -> Self {
        self.replies.insert(
            method.to_string(),
            MockReply::Remote {
                code,
                message: message.to_string(),
            },
        );
        self
    }

    pub fn with_transport_error(mut self, method: &str, message: &str) -> Self {
        self.replies
            .insert(method.to_string(), MockReply::Transport(message.to_string()));
        self
    }

    /// Methods called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RpcCaller for MockRpcCaller {
    async fn call(&self, cancel: &CancellationToken, method: &str, _params: Value) -> RpcResult<Value> {
        if cancel.is_cancelled() {
            return Err(RpcError::Cancelled);
        }
        self.calls.lock().push(method.to_string());
        match self.replies.get(method) {
            Some(reply) => reply.to_result(),
            None => Err(RpcError::Remote {
                code: -32601,
                message: "Method not found".to_string(),
            }),
        }
    }
}
