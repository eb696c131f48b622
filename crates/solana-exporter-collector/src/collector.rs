//! Per-scrape collection pass.
//!
//! [`SolanaCollector`] runs a fixed sequence of steps for every scrape:
//!
//! 1. health
//! 2. minimum ledger slot
//! 3. first available block
//! 4. vote accounts (skipped in light mode)
//! 5. version and client detection, producing [`NodeFacts`]
//! 6. identity
//! 7. balances (skipped in light mode)
//! 8. minimum required version for the current epoch
//! 9. outdated
//! 10. needs update
//!
//! Each step handles its own failure. Steps that own gauge families emit an
//! invalid sample for each of them; the two compliance steps emit nothing
//! and only log.

use crate::authority::{EpochKind, VersionAuthorityCache};
use crate::compliance::{firedancer_label, ComplianceCheck, ComplianceEvaluator, NodeFacts};
use crate::config::ExporterConfig;
use crate::descriptors::{Descriptors, STATE_CURRENT, STATE_DELINQUENT};
use async_trait::async_trait;
use solana_exporter_client::SolanaRpc;
use solana_exporter_common::cluster::cluster_from_genesis_hash;
use solana_exporter_common::error::{ExporterError, Result};
use solana_exporter_common::protocol::jsonrpc::NODE_UNHEALTHY;
use solana_exporter_common::protocol::Commitment;
use solana_exporter_metrics::{Collector, GaugeDesc, Sample};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct SolanaCollector {
    rpc: Arc<dyn SolanaRpc>,
    authority: Arc<VersionAuthorityCache>,
    compliance: ComplianceEvaluator,
    config: Arc<ExporterConfig>,
    descs: Descriptors,
}

impl SolanaCollector {
    pub fn new(
        rpc: Arc<dyn SolanaRpc>,
        authority: Arc<VersionAuthorityCache>,
        config: Arc<ExporterConfig>,
    ) -> Self {
        Self {
            rpc,
            compliance: ComplianceEvaluator::new(authority.clone()),
            authority,
            config,
            descs: Descriptors::new(),
        }
    }

    /// Builds the RPC-backed authority cache from `config` as well.
    pub fn from_config(rpc: Arc<dyn SolanaRpc>, config: Arc<ExporterConfig>) -> Result<Self> {
        let authority = Arc::new(VersionAuthorityCache::new(rpc.clone(), config.authority_config())?);
        Ok(Self::new(rpc, authority, config))
    }

    pub fn authority(&self) -> &Arc<VersionAuthorityCache> {
        &self.authority
    }

    /// Runs one pass, appending to `samples` as each step completes.
    pub async fn collect_pass(&self, samples: &mut Vec<Sample>) {
        info!("========== BEGIN COLLECTION ==========");

        self.collect_health(samples).await;
        self.collect_minimum_ledger_slot(samples).await;
        self.collect_first_available_block(samples).await;
        self.collect_vote_accounts(samples).await;
        let facts = self.collect_version(samples).await;
        self.collect_identity(samples).await;
        self.collect_balances(samples).await;
        self.collect_min_required_version(&facts, samples).await;
        self.collect_compliance(ComplianceCheck::Outdated, &facts, samples).await;
        self.collect_compliance(ComplianceCheck::NeedsUpdate, &facts, samples).await;

        info!("=========== END COLLECTION ===========");
    }

    async fn collect_health(&self, samples: &mut Vec<Sample>) {
        info!("Collecting health...");
        let d = &self.descs;

        match extract_health(self.rpc.get_health().await) {
            Ok((is_healthy, slots_behind)) => {
                samples.push(d.node_is_healthy.flag(is_healthy, NO_LABELS));
                match slots_behind {
                    Some(n) => samples.push(d.node_num_slots_behind.sample(n as f64, NO_LABELS)),
                    None => {
                        let err = ExporterError::MissingField("numSlotsBehind");
                        error!("failed to determine number of slots behind: {err}");
                        samples.push(d.node_num_slots_behind.invalid(&err));
                    }
                }
            }
            Err(err) => {
                error!("failed to determine node health: {err}");
                samples.push(d.node_is_healthy.invalid(&err));
                samples.push(d.node_num_slots_behind.invalid(&err));
            }
        }
        info!("Health collected.");
    }

    async fn collect_minimum_ledger_slot(&self, samples: &mut Vec<Sample>) {
        info!("Collecting minimum ledger slot...");
        let desc = &self.descs.node_minimum_ledger_slot;
        match self.rpc.get_minimum_ledger_slot().await {
            Ok(slot) => samples.push(desc.sample(slot as f64, NO_LABELS)),
            Err(err) => {
                error!("failed to get minimum ledger slot: {err}");
                samples.push(desc.invalid(&err));
            }
        }
        info!("Minimum ledger slot collected.");
    }

    async fn collect_first_available_block(&self, samples: &mut Vec<Sample>) {
        info!("Collecting first available block...");
        let desc = &self.descs.node_first_available_block;
        match self.rpc.get_first_available_block().await {
            Ok(block) => samples.push(desc.sample(block as f64, NO_LABELS)),
            Err(err) => {
                error!("failed to get first available block: {err}");
                samples.push(desc.invalid(&err));
            }
        }
        info!("First available block collected.");
    }

    fn is_tracked(&self, node_pubkey: &str) -> bool {
        self.config.comprehensive_vote_account_tracking
            || self.config.node_keys.iter().any(|k| k == node_pubkey)
    }

    async fn collect_vote_accounts(&self, samples: &mut Vec<Sample>) {
        if self.config.light_mode {
            debug!("Skipping vote-accounts collection in light mode.");
            return;
        }
        info!("Collecting vote accounts...");
        let d = &self.descs;

        let accounts = match self.rpc.get_vote_accounts(Commitment::Confirmed).await {
            Ok(accounts) => accounts,
            Err(err) => {
                error!("failed to get vote accounts: {err}");
                for desc in [
                    &d.validator_active_stake,
                    &d.cluster_active_stake,
                    &d.validator_last_vote,
                    &d.cluster_last_vote,
                    &d.validator_root_slot,
                    &d.cluster_root_slot,
                    &d.validator_delinquent,
                    &d.cluster_validator_count,
                ] {
                    samples.push(desc.invalid(&err));
                }
                return;
            }
        };

        let mut total_stake = 0.0;
        let mut max_last_vote = 0.0_f64;
        let mut max_root_slot = 0.0_f64;

        for account in accounts.current.iter().chain(&accounts.delinquent) {
            let stake = account.activated_stake_sol();
            let last_vote = account.last_vote as f64;
            let root_slot = account.root_slot as f64;

            if self.is_tracked(&account.node_pubkey) {
                let keys = [account.vote_pubkey.as_str(), account.node_pubkey.as_str()];
                samples.push(d.validator_active_stake.sample(stake, &keys));
                samples.push(d.validator_last_vote.sample(last_vote, &keys));
                samples.push(d.validator_root_slot.sample(root_slot, &keys));
            }

            total_stake += stake;
            max_last_vote = max_last_vote.max(last_vote);
            max_root_slot = max_root_slot.max(root_slot);
        }

        for (list, delinquent) in [(&accounts.current, false), (&accounts.delinquent, true)] {
            for account in list.iter().filter(|a| self.is_tracked(&a.node_pubkey)) {
                samples.push(d.validator_delinquent.flag(
                    delinquent,
                    &[account.vote_pubkey.as_str(), account.node_pubkey.as_str()],
                ));
            }
        }

        samples.push(d.cluster_active_stake.sample(total_stake, NO_LABELS));
        samples.push(d.cluster_last_vote.sample(max_last_vote, NO_LABELS));
        samples.push(d.cluster_root_slot.sample(max_root_slot, NO_LABELS));
        samples.push(d.cluster_validator_count.sample(accounts.current.len() as f64, &[STATE_CURRENT]));
        samples.push(
            d.cluster_validator_count
                .sample(accounts.delinquent.len() as f64, &[STATE_DELINQUENT]),
        );

        info!("Vote accounts collected.");
    }

    /// Reads the node version, probes for Firedancer and resolves the
    /// cluster. The result is shared by the remaining steps of the pass.
    async fn collect_version(&self, samples: &mut Vec<Sample>) -> NodeFacts {
        info!("Collecting version...");
        let desc = &self.descs.node_version;

        let version = self.rpc.get_version().await;
        let is_firedancer = match version {
            Ok(_) => self.probe_firedancer().await,
            Err(_) => false,
        };

        match &version {
            Ok(v) => {
                samples.push(desc.sample(1.0, &[v.as_str(), firedancer_label(is_firedancer)]));
            }
            Err(err) => {
                error!("failed to get version: {err}");
                samples.push(desc.invalid(err));
            }
        }
        info!("Version collected.");

        NodeFacts {
            version,
            is_firedancer,
            cluster: self.resolve_cluster().await,
        }
    }

    async fn probe_firedancer(&self) -> bool {
        match self.rpc.probe_firedancer().await {
            Ok(200) => {
                debug!("Firedancer metrics endpoint answered, node runs Firedancer");
                true
            }
            Ok(status) => {
                debug!(status, "Firedancer metrics endpoint answered with non-success status");
                false
            }
            Err(err) => {
                debug!("Firedancer metrics endpoint unreachable: {err}");
                false
            }
        }
    }

    async fn resolve_cluster(&self) -> Result<String> {
        let genesis_hash = self.rpc.get_genesis_hash().await?;
        cluster_from_genesis_hash(&genesis_hash).map(str::to_string)
    }

    async fn collect_identity(&self, samples: &mut Vec<Sample>) {
        info!("Collecting identity...");
        let d = &self.descs;

        let identity = match self.rpc.get_identity().await {
            Ok(identity) => identity,
            Err(err) => {
                error!("failed to get identity: {err}");
                samples.push(d.node_identity.invalid(&err));
                return;
            }
        };

        if let Some(active) = &self.config.active_identity {
            samples.push(d.node_is_active.flag(*active == identity, &[identity.as_str()]));
            info!("NodeIsActive collected.");
        }

        samples.push(d.node_identity.sample(1.0, &[identity.as_str()]));
        info!("Identity collected.");
    }

    async fn collect_balances(&self, samples: &mut Vec<Sample>) {
        if self.config.light_mode {
            debug!("Skipping balance collection in light mode.");
            return;
        }
        info!("Collecting balances...");
        let desc = &self.descs.account_balances;

        let addresses = combine_unique(&[
            &self.config.balance_addresses,
            &self.config.node_keys,
            &self.config.vote_keys,
        ]);

        match fetch_balances(self.rpc.as_ref(), &addresses).await {
            Ok(balances) => {
                for (address, balance) in balances {
                    samples.push(desc.sample(balance, &[address.as_str()]));
                }
            }
            Err(err) => {
                error!("failed to get balances: {err}");
                samples.push(desc.invalid(&err));
            }
        }
        info!("Balances collected.");
    }

    async fn collect_min_required_version(&self, facts: &NodeFacts, samples: &mut Vec<Sample>) {
        info!("Collecting minimum required version...");
        let desc = &self.descs.foundation_min_required_version;

        let cluster = match &facts.cluster {
            Ok(cluster) => cluster,
            Err(err) => {
                error!("failed to get min required version: {err}");
                samples.push(desc.invalid(err));
                return;
            }
        };

        match self.authority.resolve(cluster, EpochKind::Current).await {
            Ok(resolved) => {
                let epoch = resolved.epoch.to_string();
                samples.push(desc.sample(
                    1.0,
                    &[
                        resolved.agave_min_version.as_str(),
                        resolved.firedancer_min_version.as_str(),
                        cluster.as_str(),
                        epoch.as_str(),
                    ],
                ));
            }
            Err(err) => {
                error!("failed to get min required version: {err}");
                samples.push(desc.invalid(&err));
            }
        }
        info!("Minimum required version collected.");
    }

    async fn collect_compliance(&self, check: ComplianceCheck, facts: &NodeFacts, samples: &mut Vec<Sample>) {
        let desc = self.compliance_desc(check);
        match self.compliance.evaluate(check, facts).await {
            Ok(verdict) => samples.push(verdict.to_sample(desc)),
            Err(skip) => error!(metric = desc.name(), "{skip}"),
        }
    }

    fn compliance_desc(&self, check: ComplianceCheck) -> &GaugeDesc {
        match check {
            ComplianceCheck::Outdated => &self.descs.node_outdated,
            ComplianceCheck::NeedsUpdate => &self.descs.node_needs_update,
        }
    }
}

#[async_trait]
impl Collector for SolanaCollector {
    fn describe(&self) -> Vec<GaugeDesc> {
        self.descs.all()
    }

    async fn collect(&self, samples: &mut Vec<Sample>) {
        self.collect_pass(samples).await;
    }
}

const NO_LABELS: &[&str] = &[];

/// Splits a `getHealth` outcome into the healthy flag and slots behind.
///
/// A healthy node is 0 slots behind. A `NODE_UNHEALTHY` error is a valid
/// "unhealthy" answer; its slot count may be unknown. Any other error leaves
/// both values undetermined.
pub fn extract_health(result: Result<()>) -> Result<(bool, Option<u64>)> {
    match result {
        Ok(()) => Ok((true, Some(0))),
        Err(ExporterError::Rpc(err)) if err.code == NODE_UNHEALTHY => {
            let slots_behind = err
                .data
                .as_ref()
                .and_then(|data| data.get("numSlotsBehind"))
                .and_then(|n| n.as_u64());
            Ok((false, slots_behind))
        }
        Err(err) => Err(err),
    }
}

/// Concatenates `lists`, keeping the first occurrence of each entry.
pub fn combine_unique(lists: &[&Vec<String>]) -> Vec<String> {
    let mut combined: Vec<String> = Vec::new();
    for item in lists.iter().flat_map(|list| list.iter()) {
        if !combined.contains(item) {
            combined.push(item.clone());
        }
    }
    combined
}

/// Fetches the SOL balance of each address; the first failure aborts.
pub async fn fetch_balances(rpc: &dyn SolanaRpc, addresses: &[String]) -> Result<Vec<(String, f64)>> {
    let mut balances = Vec::with_capacity(addresses.len());
    for address in addresses {
        let balance = rpc.get_balance(address).await?;
        balances.push((address.clone(), balance));
    }
    Ok(balances)
}
