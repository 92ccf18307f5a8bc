#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use kanboard_gate_core::{Credentials, RequestConfig, RpcClient, Settings, SharedLogger};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/jsonrpc.php", addr)
}

/// Fast retries so failure paths finish quickly
pub fn quick_request() -> RequestConfig {
    RequestConfig::default()
        .with_retry_delay(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(5))
}

pub fn settings(endpoint: &str) -> Settings {
    Settings::default()
        .with_endpoint(endpoint)
        .with_credentials(Credentials::api_key("secret-token"))
        .with_request(quick_request())
}

pub fn client(endpoint: &str, logger: SharedLogger) -> RpcClient {
    RpcClient::new(&settings(endpoint), logger).unwrap()
}

pub fn reply(id: &Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

pub fn remote_error(id: &Value, code: i64, message: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
}

pub fn noop() -> SharedLogger {
    Arc::new(kanboard_gate_core::NoOpLogger::new())
}
