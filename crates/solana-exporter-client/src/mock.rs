//! In-memory [`SolanaRpc`] implementation.
//!
//! `MockRpc` answers every call from a mutable state snapshot and counts
//! calls per method, so tests can assert both on what the exporter emitted
//! and on how many round trips it made. Any method can be made to fail with
//! [`MockRpc::fail`].

use crate::rpc::SolanaRpc;
use async_trait::async_trait;
use serde_json::json;
use solana_exporter_common::cluster::MAINNET_GENESIS_HASH;
use solana_exporter_common::error::{ExporterError, Result, RpcError};
use solana_exporter_common::protocol::jsonrpc::NODE_UNHEALTHY;
use solana_exporter_common::protocol::{Commitment, EpochInfo, VoteAccounts};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const GET_EPOCH_INFO: &str = "getEpochInfo";
pub const GET_VERSION: &str = "getVersion";
pub const GET_GENESIS_HASH: &str = "getGenesisHash";
pub const GET_HEALTH: &str = "getHealth";
pub const GET_VOTE_ACCOUNTS: &str = "getVoteAccounts";
pub const MINIMUM_LEDGER_SLOT: &str = "minimumLedgerSlot";
pub const GET_FIRST_AVAILABLE_BLOCK: &str = "getFirstAvailableBlock";
pub const GET_IDENTITY: &str = "getIdentity";
pub const GET_BALANCE: &str = "getBalance";
pub const PROBE_FIREDANCER: &str = "probeFiredancer";

#[derive(Debug, Clone)]
struct MockState {
    epoch: u64,
    version: String,
    genesis_hash: String,
    identity: String,
    vote_accounts: VoteAccounts,
    minimum_ledger_slot: u64,
    first_available_block: u64,
    balances: HashMap<String, f64>,
    firedancer_status: Option<u16>,
    failures: HashMap<&'static str, RpcError>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            epoch: 0,
            version: "2.2.14".to_string(),
            genesis_hash: MAINNET_GENESIS_HASH.to_string(),
            identity: String::new(),
            vote_accounts: VoteAccounts::default(),
            minimum_ledger_slot: 0,
            first_available_block: 0,
            balances: HashMap::new(),
            firedancer_status: None,
            failures: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockRpc {
    state: Mutex<MockState>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_epoch(&self, epoch: u64) {
        lock(&self.state).epoch = epoch;
    }

    pub fn set_version(&self, version: impl Into<String>) {
        lock(&self.state).version = version.into();
    }

    pub fn set_genesis_hash(&self, hash: impl Into<String>) {
        lock(&self.state).genesis_hash = hash.into();
    }

    pub fn set_identity(&self, identity: impl Into<String>) {
        lock(&self.state).identity = identity.into();
    }

    pub fn set_vote_accounts(&self, accounts: VoteAccounts) {
        lock(&self.state).vote_accounts = accounts;
    }

    pub fn set_minimum_ledger_slot(&self, slot: u64) {
        lock(&self.state).minimum_ledger_slot = slot;
    }

    pub fn set_first_available_block(&self, block: u64) {
        lock(&self.state).first_available_block = block;
    }

    /// Sets the balance, in SOL, reported for `address`.
    pub fn set_balance(&self, address: impl Into<String>, sol: f64) {
        lock(&self.state).balances.insert(address.into(), sol);
    }

    /// `None` makes the probe fail at the transport level.
    pub fn set_firedancer_status(&self, status: Option<u16>) {
        lock(&self.state).firedancer_status = status;
    }

    /// Makes `getHealth` answer like a node that fell behind.
    pub fn set_unhealthy(&self, num_slots_behind: Option<u64>) {
        self.fail_with(
            GET_HEALTH,
            RpcError {
                code: NODE_UNHEALTHY,
                method: GET_HEALTH.to_string(),
                message: "Node is unhealthy".to_string(),
                data: Some(json!({ "numSlotsBehind": num_slots_behind })),
            },
        );
    }

    /// Makes `method` fail with a generic server error.
    pub fn fail(&self, method: &'static str, message: impl Into<String>) {
        self.fail_with(
            method,
            RpcError {
                code: -32000,
                method: method.to_string(),
                message: message.into(),
                data: None,
            },
        );
    }

    pub fn fail_with(&self, method: &'static str, error: RpcError) {
        lock(&self.state).failures.insert(method, error);
    }

    pub fn recover(&self, method: &'static str) {
        lock(&self.state).failures.remove(method);
    }

    /// Number of times `method` has been called, failed calls included.
    pub fn call_count(&self, method: &str) -> usize {
        lock(&self.calls).get(method).copied().unwrap_or(0)
    }

    /// Records the call and returns a snapshot of the state, or the
    /// configured failure.
    fn enter(&self, method: &'static str) -> Result<MockState> {
        *lock(&self.calls).entry(method).or_insert(0) += 1;
        let state = lock(&self.state);
        match state.failures.get(method) {
            Some(err) => Err(ExporterError::Rpc(err.clone())),
            None => Ok(state.clone()),
        }
    }
}

#[async_trait]
impl SolanaRpc for MockRpc {
    async fn get_epoch_info(&self, _commitment: Commitment) -> Result<EpochInfo> {
        let state = self.enter(GET_EPOCH_INFO)?;
        Ok(EpochInfo {
            epoch: state.epoch,
            ..EpochInfo::default()
        })
    }

    async fn get_version(&self) -> Result<String> {
        Ok(self.enter(GET_VERSION)?.version)
    }

    async fn get_genesis_hash(&self) -> Result<String> {
        Ok(self.enter(GET_GENESIS_HASH)?.genesis_hash)
    }

    async fn get_health(&self) -> Result<()> {
        self.enter(GET_HEALTH).map(|_| ())
    }

    async fn get_vote_accounts(&self, _commitment: Commitment) -> Result<VoteAccounts> {
        Ok(self.enter(GET_VOTE_ACCOUNTS)?.vote_accounts)
    }

    async fn get_minimum_ledger_slot(&self) -> Result<u64> {
        Ok(self.enter(MINIMUM_LEDGER_SLOT)?.minimum_ledger_slot)
    }

    async fn get_first_available_block(&self) -> Result<u64> {
        Ok(self.enter(GET_FIRST_AVAILABLE_BLOCK)?.first_available_block)
    }

    async fn get_identity(&self) -> Result<String> {
        Ok(self.enter(GET_IDENTITY)?.identity)
    }

    async fn get_balance(&self, address: &str) -> Result<f64> {
        let state = self.enter(GET_BALANCE)?;
        state.balances.get(address).copied().ok_or_else(|| {
            ExporterError::Rpc(RpcError {
                code: -32602,
                method: GET_BALANCE.to_string(),
                message: format!("Invalid param: unknown account {address}"),
                data: None,
            })
        })
    }

    async fn probe_firedancer(&self) -> Result<u16> {
        self.enter(PROBE_FIREDANCER)?
            .firedancer_status
            .ok_or_else(|| ExporterError::Network("connection refused".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults() {
        let rpc = MockRpc::new();
        assert_eq!(rpc.get_version().await.unwrap(), "2.2.14");
        assert_eq!(rpc.get_genesis_hash().await.unwrap(), MAINNET_GENESIS_HASH);
        assert!(rpc.get_health().await.is_ok());
        assert!(rpc.probe_firedancer().await.is_err());
    }

    #[tokio::test]
    async fn test_failure_and_recovery() {
        let rpc = MockRpc::new();
        rpc.fail(GET_IDENTITY, "boom");
        let err = rpc.get_identity().await.unwrap_err();
        assert!(err.to_string().contains("boom"));

        rpc.recover(GET_IDENTITY);
        rpc.set_identity("node1");
        assert_eq!(rpc.get_identity().await.unwrap(), "node1");
        assert_eq!(rpc.call_count(GET_IDENTITY), 2);
    }

    #[tokio::test]
    async fn test_unhealthy_carries_slots_behind() {
        let rpc = MockRpc::new();
        rpc.set_unhealthy(Some(42));
        match rpc.get_health().await {
            Err(ExporterError::Rpc(err)) => {
                assert_eq!(err.code, NODE_UNHEALTHY);
                assert_eq!(err.data, Some(json!({"numSlotsBehind": 42})));
            }
            other => panic!("expected unhealthy error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_balance_fails() {
        let rpc = MockRpc::new();
        rpc.set_balance("addr1", 1.5);
        assert_eq!(rpc.get_balance("addr1").await.unwrap(), 1.5);
        assert!(rpc.get_balance("addr2").await.is_err());
    }
}
