//! Solana RPC payloads decoded by the exporter.

use serde::{Deserialize, Serialize};

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Commitment level attached to state-reading calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochInfo {
    pub epoch: u64,
    #[serde(default)]
    pub absolute_slot: u64,
    #[serde(default)]
    pub block_height: u64,
    #[serde(default)]
    pub slot_index: u64,
    #[serde(default)]
    pub slots_in_epoch: u64,
    #[serde(default)]
    pub transaction_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteAccount {
    pub vote_pubkey: String,
    pub node_pubkey: String,
    pub activated_stake: u64,
    pub last_vote: u64,
    pub root_slot: u64,
    #[serde(default)]
    pub commission: u8,
    #[serde(default)]
    pub epoch_vote_account: bool,
}

impl VoteAccount {
    pub fn activated_stake_sol(&self) -> f64 {
        self.activated_stake as f64 / LAMPORTS_PER_SOL
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteAccounts {
    #[serde(default)]
    pub current: Vec<VoteAccount>,
    #[serde(default)]
    pub delinquent: Vec<VoteAccount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "solana-core")]
    pub solana_core: String,
    #[serde(rename = "feature-set", default)]
    pub feature_set: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityInfo {
    pub identity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcContext {
    pub slot: u64,
}

/// Wrapper used by calls that return `{"context": {...}, "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextValue<T> {
    pub context: RpcContext,
    pub value: T,
}
