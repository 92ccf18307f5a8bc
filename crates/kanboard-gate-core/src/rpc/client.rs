//! JSON-RPC client for the remote Kanboard endpoint
//!
//! One call = up to `max_retries + 1` sequential attempts. Each attempt
//! builds a fresh envelope, picks the auth scheme, POSTs with a
//! per-attempt timeout and reads the whole body before classifying it.
//! The caller's `CancellationToken` is raced against the request and the
//! inter-retry delay.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::Credentials;
use super::envelope::{RpcRequest, RpcResponse};
use super::error::{RpcError, RpcResult};
use crate::config::{RequestConfig, Settings};
use crate::logging::SharedLogger;
use crate::types::CancellationToken;
use crate::{log_debug, log_info, log_warn};

pub const USER_AGENT: &str = "KanboardMCP/1.0";

/// Anything that can execute a remote procedure
///
/// `RpcClient` is the production implementation; identity resolution
/// depends only on this trait.
#[async_trait]
pub trait RpcCaller: Send + Sync {
    /// Invoke `method` with `params` (`Value::Null` for none) and return `result`
    async fn call(&self, cancel: &CancellationToken, method: &str, params: Value) -> RpcResult<Value>;
}

/// Decode a `result` value into a typed schema
pub fn decode_result<R: DeserializeOwned>(method: &str, value: Value) -> RpcResult<R> {
    serde_json::from_value(value).map_err(|source| RpcError::Decoding {
        method: method.to_string(),
        source,
    })
}

/// Call through any `RpcCaller` and decode the result
pub async fn call_as<R: DeserializeOwned>(
    caller: &dyn RpcCaller,
    cancel: &CancellationToken,
    method: &str,
    params: Value,
) -> RpcResult<R> {
    let value = caller.call(cancel, method, params).await?;
    decode_result(method, value)
}

/// Resilient JSON-RPC over HTTP client
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
    config: RequestConfig,
    request_id: AtomicU64,
    logger: SharedLogger,
}

impl RpcClient {
    /// Build a client from startup settings
    pub fn new(settings: &Settings, logger: SharedLogger) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            credentials: settings.credentials.clone(),
            config: settings.request.clone(),
            request_id: AtomicU64::new(0),
            logger,
        })
    }

    /// Replace the default request policy
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Call and decode the result into `R`
    pub async fn call_as<R: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        method: &str,
        params: Value,
    ) -> RpcResult<R> {
        let value = self.call_with_config(cancel, method, params, &self.config).await?;
        decode_result(method, value)
    }

    /// Call with an explicit request policy
    pub async fn call_with_config(
        &self,
        cancel: &CancellationToken,
        method: &str,
        params: Value,
        config: &RequestConfig,
    ) -> RpcResult<Value> {
        if method.is_empty() {
            return Err(RpcError::Validation("method cannot be empty".to_string()));
        }

        log_debug!(self.logger, "Calling Kanboard API method: {}", method);

        let max_attempts = config.max_attempts();
        let mut attempt = 1;
        loop {
            if cancel.is_cancelled() {
                return Err(RpcError::Cancelled);
            }

            let err = match self.execute(cancel, method, &params, config).await {
                Ok(result) => return Ok(result),
                Err(err) => err,
            };

            if !err.is_retryable() {
                log_debug!(self.logger, "{} failed with non-retryable error: {}", method, err);
                return Err(err);
            }
            if attempt >= max_attempts {
                return Err(RpcError::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            log_warn!(self.logger, "{} attempt {}/{} failed: {}", method, attempt, max_attempts, err);
            attempt += 1;
            if config.logging_enabled {
                log_info!(
                    self.logger,
                    "Retrying API call to {} (attempt {}/{})",
                    method,
                    attempt,
                    max_attempts
                );
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(RpcError::Cancelled),
                _ = tokio::time::sleep(config.retry_delay) => {}
            }
        }
    }

    /// One attempt
    async fn execute(
        &self,
        cancel: &CancellationToken,
        method: &str,
        params: &Value,
        config: &RequestConfig,
    ) -> RpcResult<Value> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let body = RpcRequest::new(method, id, params);

        log_debug!(self.logger, "API request to {}: method={} id={}", self.endpoint, method, id);

        let scheme = self.credentials.scheme().map_err(|e| {
            log_debug!(self.logger, "Authentication setup failed: {}", e);
            e
        })?;
        log_debug!(self.logger, "Using {}", scheme.describe());

        if config.logging_enabled {
            log_info!(self.logger, "Making API call to {}", method);
        }

        let request = self
            .http
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, scheme.header_value())
            .timeout(config.timeout)
            .json(&body);

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(RpcError::Cancelled),
            sent = request.send() => sent.map_err(|e| self.transport_error(e, config))?,
        };

        let status = response.status();
        log_debug!(self.logger, "HTTP response status: {}", status);

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(RpcError::Cancelled),
            read = response.bytes() => read.map_err(|e| self.transport_error(e, config))?,
        };

        if status != reqwest::StatusCode::OK {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            log_debug!(self.logger, "HTTP error response body: {}", body);
            return Err(RpcError::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
                body,
            ));
        }

        let envelope = RpcResponse::from_slice(&bytes)?;
        if !envelope.matches_id(id) {
            log_warn!(
                self.logger,
                "Response id {:?} does not match request id {} for {}",
                envelope.id,
                id,
                method
            );
        }
        envelope.into_result()
    }

    fn transport_error(&self, e: reqwest::Error, config: &RequestConfig) -> RpcError {
        log_debug!(self.logger, "HTTP request failed: {}", e);
        if e.is_timeout() {
            RpcError::Timeout(config.timeout)
        } else {
            RpcError::from(e)
        }
    }
}

#[async_trait]
impl RpcCaller for RpcClient {
    async fn call(&self, cancel: &CancellationToken, method: &str, params: Value) -> RpcResult<Value> {
        self.call_with_config(cancel, method, params, &self.config).await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish()
    }
}
