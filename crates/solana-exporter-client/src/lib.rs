//! Solana RPC Client
//!
//! The exporter talks to a validator only through the [`SolanaRpc`] trait.
//! [`HttpRpcClient`] implements it with JSON-RPC 2.0 over HTTP POST;
//! [`MockRpc`] is an in-memory implementation for tests.

pub mod client;
pub mod mock;
pub mod rpc;

pub use client::HttpRpcClient;
pub use mock::MockRpc;
pub use rpc::SolanaRpc;
