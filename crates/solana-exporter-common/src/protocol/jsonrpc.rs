//! JSON-RPC 2.0 Envelopes
//!
//! Solana nodes speak JSON-RPC 2.0 over HTTP POST. The exporter only acts as
//! a client, so this module carries the request envelope it sends and the
//! response envelope it decodes.
//!
//! - Request format: `{"jsonrpc": "2.0", "method": "...", "params": [...], "id": ...}`
//! - Response format: `{"jsonrpc": "2.0", "result": ..., "error": ..., "id": ...}`
//! - Error format: `{"code": ..., "message": "...", "data": ...}`
//!
//! # Error Codes
//!
//! Besides the standard `-32700..-32600` range, Solana defines custom server
//! error codes in `-32001..-32018`. The ones the exporter reacts to are
//! exported as constants below.
//!
//! # Example
//!
//! ```
//! use solana_exporter_common::protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::new(1, "getVersion", json!([]));
//! assert_eq!(request.jsonrpc, "2.0");
//!
//! let response: JsonRpcResponse =
//!     serde_json::from_str(r#"{"jsonrpc":"2.0","result":{"solana-core":"2.2.14"},"id":1}"#).unwrap();
//! let result = response.into_result("getVersion").unwrap();
//! assert_eq!(result["solana-core"], "2.2.14");
//! ```

use crate::error::{ExporterError, Result, RpcError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Name of the method to invoke
    pub method: String,
    /// Positional parameters
    pub params: Value,
    /// Request identifier
    pub id: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Result value on success (None if error is present)
    pub result: Option<Value>,
    /// Error object on failure (None if result is present)
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

/// The node is behind the cluster; `data.numSlotsBehind` carries the lag
pub const NODE_UNHEALTHY: i64 = -32005;

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: Value::from(id),
        }
    }
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Unwraps the envelope of a call to `method`.
    ///
    /// An error object becomes [`ExporterError::Rpc`]; a response with
    /// neither error nor result is a decode failure.
    pub fn into_result(self, method: &str) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(RpcError {
                code: error.code,
                method: method.to_string(),
                message: error.message,
                data: error.data,
            }
            .into());
        }
        self.result
            .ok_or_else(|| ExporterError::Decode(format!("{method} response has no result")))
    }
}

impl JsonRpcError {
    pub fn node_unhealthy(num_slots_behind: Option<u64>) -> Self {
        let message = match num_slots_behind {
            Some(n) => format!("Node is behind by {n} slots"),
            None => "Node is unhealthy".to_string(),
        };
        Self {
            code: NODE_UNHEALTHY,
            message,
            data: Some(serde_json::json!({ "numSlotsBehind": num_slots_behind })),
        }
    }
}
