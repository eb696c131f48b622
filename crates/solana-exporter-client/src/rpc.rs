use async_trait::async_trait;
use solana_exporter_common::error::Result;
use solana_exporter_common::protocol::{Commitment, EpochInfo, VoteAccounts};

/// Read-only view of a Solana node.
///
/// Every method maps to one JSON-RPC call except [`probe_firedancer`], which
/// issues a plain GET against the Firedancer metrics endpoint and reports the
/// HTTP status it got back.
///
/// [`probe_firedancer`]: SolanaRpc::probe_firedancer
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    async fn get_epoch_info(&self, commitment: Commitment) -> Result<EpochInfo>;

    /// Returns the `solana-core` version string.
    async fn get_version(&self) -> Result<String>;

    async fn get_genesis_hash(&self) -> Result<String>;

    /// `Ok(())` when healthy. An unhealthy node answers with a
    /// `NODE_UNHEALTHY` RPC error whose data may carry `numSlotsBehind`.
    async fn get_health(&self) -> Result<()>;

    async fn get_vote_accounts(&self, commitment: Commitment) -> Result<VoteAccounts>;

    async fn get_minimum_ledger_slot(&self) -> Result<u64>;

    async fn get_first_available_block(&self) -> Result<u64>;

    async fn get_identity(&self) -> Result<String>;

    /// Balance of `address` in SOL.
    async fn get_balance(&self, address: &str) -> Result<f64>;

    async fn probe_firedancer(&self) -> Result<u16>;
}
