use solana_exporter_metrics::GaugeDesc;

pub const NODEKEY_LABEL: &str = "nodekey";
pub const VOTEKEY_LABEL: &str = "votekey";
pub const VERSION_LABEL: &str = "version";
pub const IDENTITY_LABEL: &str = "identity";
pub const ADDRESS_LABEL: &str = "address";
pub const EPOCH_LABEL: &str = "epoch";
pub const STATE_LABEL: &str = "state";
pub const IS_FIREDANCER_LABEL: &str = "is_firedancer";
pub const CLUSTER_LABEL: &str = "cluster";
pub const REQUIRED_VERSION_LABEL: &str = "required_version";

pub const STATE_CURRENT: &str = "current";
pub const STATE_DELINQUENT: &str = "delinquent";

/// Every gauge family the exporter can emit.
#[derive(Debug, Clone)]
pub struct Descriptors {
    pub validator_active_stake: GaugeDesc,
    pub cluster_active_stake: GaugeDesc,
    pub validator_last_vote: GaugeDesc,
    pub cluster_last_vote: GaugeDesc,
    pub validator_root_slot: GaugeDesc,
    pub cluster_root_slot: GaugeDesc,
    pub validator_delinquent: GaugeDesc,
    pub cluster_validator_count: GaugeDesc,
    pub account_balances: GaugeDesc,
    pub node_version: GaugeDesc,
    pub node_identity: GaugeDesc,
    pub node_is_active: GaugeDesc,
    pub node_is_healthy: GaugeDesc,
    pub node_num_slots_behind: GaugeDesc,
    pub node_minimum_ledger_slot: GaugeDesc,
    pub node_first_available_block: GaugeDesc,
    pub foundation_min_required_version: GaugeDesc,
    pub node_outdated: GaugeDesc,
    pub node_needs_update: GaugeDesc,
}

impl Descriptors {
    pub fn new() -> Self {
        let per_validator = [VOTEKEY_LABEL, NODEKEY_LABEL];
        let compliance = [
            IS_FIREDANCER_LABEL,
            VERSION_LABEL,
            REQUIRED_VERSION_LABEL,
            CLUSTER_LABEL,
            EPOCH_LABEL,
        ];

        Self {
            validator_active_stake: GaugeDesc::new(
                "solana_validator_active_stake",
                "Active stake (in SOL) per validator (represented by votekey and nodekey)",
                &per_validator,
            ),
            cluster_active_stake: GaugeDesc::new(
                "solana_cluster_active_stake",
                "Total active stake (in SOL) of the cluster",
                &[],
            ),
            validator_last_vote: GaugeDesc::new(
                "solana_validator_last_vote",
                "Last voted-on slot per validator (represented by votekey and nodekey)",
                &per_validator,
            ),
            cluster_last_vote: GaugeDesc::new(
                "solana_cluster_last_vote",
                "Most recent voted-on slot of the cluster",
                &[],
            ),
            validator_root_slot: GaugeDesc::new(
                "solana_validator_root_slot",
                "Root slot per validator (represented by votekey and nodekey)",
                &per_validator,
            ),
            cluster_root_slot: GaugeDesc::new(
                "solana_cluster_root_slot",
                "Max root slot of the cluster",
                &[],
            ),
            validator_delinquent: GaugeDesc::new(
                "solana_validator_delinquent",
                "Whether a validator (represented by votekey and nodekey) is delinquent",
                &per_validator,
            ),
            cluster_validator_count: GaugeDesc::new(
                "solana_cluster_validator_count",
                "Total number of validators in the cluster, grouped by state ('current' or 'delinquent')",
                &[STATE_LABEL],
            ),
            account_balances: GaugeDesc::new(
                "solana_account_balance",
                "Solana account balances, grouped by address",
                &[ADDRESS_LABEL],
            ),
            node_version: GaugeDesc::new(
                "solana_node_version",
                "Node version of solana",
                &[VERSION_LABEL, IS_FIREDANCER_LABEL],
            ),
            node_identity: GaugeDesc::new(
                "solana_node_identity",
                "Node identity of solana",
                &[IDENTITY_LABEL],
            ),
            node_is_active: GaugeDesc::new(
                "solana_node_is_active",
                "Whether the node is active and participating in consensus (using identity pubkey)",
                &[IDENTITY_LABEL],
            ),
            node_is_healthy: GaugeDesc::new(
                "solana_node_is_healthy",
                "Whether the node is healthy",
                &[],
            ),
            node_num_slots_behind: GaugeDesc::new(
                "solana_node_num_slots_behind",
                "The number of slots that the node is behind the latest cluster confirmed slot.",
                &[],
            ),
            node_minimum_ledger_slot: GaugeDesc::new(
                "solana_node_minimum_ledger_slot",
                "The lowest slot that the node has information about in its ledger.",
                &[],
            ),
            node_first_available_block: GaugeDesc::new(
                "solana_node_first_available_block",
                "The slot of the lowest confirmed block that has not been purged from the node's ledger.",
                &[],
            ),
            foundation_min_required_version: GaugeDesc::new(
                "solana_foundation_min_required_version",
                "Minimum required Solana version for the solana foundation delegation program",
                &["agave_min_version", "firedancer_min_version", CLUSTER_LABEL, EPOCH_LABEL],
            ),
            node_outdated: GaugeDesc::new(
                "solana_node_outdated",
                "Whether the node is running a version below the required minimum for the current epoch",
                &compliance,
            ),
            node_needs_update: GaugeDesc::new(
                "solana_node_needs_update",
                "Whether the node needs to be updated before the next epoch to remain compliant",
                &compliance,
            ),
        }
    }

    /// Every declared family.
    pub fn all(&self) -> Vec<GaugeDesc> {
        vec![
            self.node_version.clone(),
            self.node_identity.clone(),
            self.validator_active_stake.clone(),
            self.cluster_active_stake.clone(),
            self.validator_last_vote.clone(),
            self.cluster_last_vote.clone(),
            self.validator_root_slot.clone(),
            self.cluster_root_slot.clone(),
            self.validator_delinquent.clone(),
            self.cluster_validator_count.clone(),
            self.account_balances.clone(),
            self.node_is_healthy.clone(),
            self.node_num_slots_behind.clone(),
            self.node_minimum_ledger_slot.clone(),
            self.node_first_available_block.clone(),
            self.node_is_active.clone(),
            self.foundation_min_required_version.clone(),
            self.node_outdated.clone(),
            self.node_needs_update.clone(),
        ]
    }
}

impl Default for Descriptors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let descs = Descriptors::new().all();
        let names: HashSet<_> = descs.iter().map(|d| d.name()).collect();
        assert_eq!(names.len(), descs.len());
        assert_eq!(descs.len(), 19);
    }

    #[test]
    fn test_compliance_label_order() {
        let descs = Descriptors::new();
        assert_eq!(
            descs.node_outdated.labels(),
            &["is_firedancer", "version", "required_version", "cluster", "epoch"]
        );
        assert_eq!(descs.node_outdated.labels(), descs.node_needs_update.labels());
    }
}
