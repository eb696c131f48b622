//! Genesis hash to cluster name mapping.

use crate::error::{ExporterError, Result};

pub const MAINNET_GENESIS_HASH: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d";
pub const TESTNET_GENESIS_HASH: &str = "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3zQawwpjk2NsNY";
pub const DEVNET_GENESIS_HASH: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG";

pub const MAINNET_BETA: &str = "mainnet-beta";
pub const TESTNET: &str = "testnet";
pub const DEVNET: &str = "devnet";

/// Returns the cluster a node belongs to, identified by its genesis hash.
pub fn cluster_from_genesis_hash(hash: &str) -> Result<&'static str> {
    match hash {
        MAINNET_GENESIS_HASH => Ok(MAINNET_BETA),
        TESTNET_GENESIS_HASH => Ok(TESTNET),
        DEVNET_GENESIS_HASH => Ok(DEVNET),
        other => Err(ExporterError::UnknownCluster(other.to_string())),
    }
}
