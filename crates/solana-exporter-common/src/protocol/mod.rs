pub mod jsonrpc;
pub mod types;

pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use types::*;
