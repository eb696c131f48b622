//! Solana Exporter Common Types
//!
//! This crate provides the types shared by every component of the exporter:
//!
//! - **Errors**: [`ExporterError`] and the crate-wide [`Result`] alias
//! - **Protocol**: JSON-RPC 2.0 envelopes and the Solana RPC payloads the
//!   exporter decodes (epoch info, vote accounts, version, balances)
//! - **Clusters**: mapping from a genesis hash to the cluster name used when
//!   querying the version authority
//!
//! # Example
//!
//! ```
//! use solana_exporter_common::cluster::{cluster_from_genesis_hash, MAINNET_GENESIS_HASH};
//!
//! let cluster = cluster_from_genesis_hash(MAINNET_GENESIS_HASH).unwrap();
//! assert_eq!(cluster, "mainnet-beta");
//! ```

pub mod cluster;
pub mod error;
pub mod protocol;

pub use error::{ExporterError, Result, RpcError};
pub use protocol::*;
