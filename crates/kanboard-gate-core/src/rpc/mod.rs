//! JSON-RPC over HTTP(S) to the remote Kanboard endpoint
//!
//! - `envelope`: request/response bodies
//! - `auth`: credential handling and `Authorization` header selection
//! - `client`: retrying, cancellable `RpcClient` and the `RpcCaller` seam
//! - `mock`: scripted `RpcCaller` for tests
//!
//! ```rust,ignore
//! let client = RpcClient::new(&settings, settings.logger())?;
//! let me: Value = client.call(&CancellationToken::new(), "getMe", Value::Null).await?;
//! ```

mod auth;
mod client;
mod envelope;
mod error;
mod mock;

pub use auth::{
    mask_api_key, mask_password, AuthMethod, AuthScheme, Credentials, PLACEHOLDER_API_KEY,
    PLACEHOLDER_PASSWORD, PLACEHOLDER_USERNAME,
};
pub use client::{call_as, decode_result, RpcCaller, RpcClient, USER_AGENT};
pub use envelope::{RpcErrorObject, RpcRequest, RpcResponse, JSONRPC_VERSION};
pub use error::{ErrorKind, RpcError, RpcResult};
pub use mock::{MockReply, MockRpcCaller};
