use serde_json::Value;
use thiserror::Error;

/// Error object returned by a Solana node for a failed JSON-RPC call.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{method} failed with code {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub method: String,
    pub message: String,
    pub data: Option<Value>,
}

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No data found in response")]
    NoData,

    #[error("{0} not found in response")]
    MissingField(&'static str),

    #[error("Failed to get current epoch: {0}")]
    EpochLookup(#[source] Box<ExporterError>),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Unknown cluster for genesis hash {0}")]
    UnknownCluster(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Decode(err.to_string())
    }
}

impl ExporterError {
    /// Wraps the failure of the epoch lookup that precedes record selection.
    pub fn epoch_lookup(cause: ExporterError) -> Self {
        ExporterError::EpochLookup(Box::new(cause))
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
