use crate::authority::{EpochKind, ResolvedVersions, VersionAuthorityCache};
use crate::version::compare_versions;
use solana_exporter_common::error::{ExporterError, Result};
use solana_exporter_metrics::{GaugeDesc, Sample};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// What the version step learned about the node during one pass.
#[derive(Debug)]
pub struct NodeFacts {
    /// Reported `solana-core` version, or why it could not be read.
    pub version: Result<String>,
    pub is_firedancer: bool,
    /// Cluster derived from the genesis hash, or why it could not be.
    pub cluster: Result<String>,
}

/// Value of the `is_firedancer` label.
pub fn firedancer_label(is_firedancer: bool) -> &'static str {
    if is_firedancer {
        "1"
    } else {
        "0"
    }
}

/// The two compliance signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceCheck {
    /// Node runs below the minimum for the current epoch.
    Outdated,
    /// Node runs below the minimum for the next epoch.
    NeedsUpdate,
}

impl ComplianceCheck {
    pub fn epoch_kind(self) -> EpochKind {
        match self {
            ComplianceCheck::Outdated => EpochKind::Current,
            ComplianceCheck::NeedsUpdate => EpochKind::Next,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceVerdict {
    pub check: ComplianceCheck,
    /// True when the node version is below `required_version`.
    pub below_required: bool,
    pub version: String,
    pub required_version: String,
    pub cluster: String,
    pub epoch: u64,
    pub is_firedancer: bool,
}

impl ComplianceVerdict {
    /// Label order: is_firedancer, version, required_version, cluster, epoch.
    pub fn to_sample(&self, desc: &GaugeDesc) -> Sample {
        let epoch = self.epoch.to_string();
        desc.flag(
            self.below_required,
            &[
                firedancer_label(self.is_firedancer),
                self.version.as_str(),
                self.required_version.as_str(),
                self.cluster.as_str(),
                epoch.as_str(),
            ],
        )
    }
}

/// Minimum version that applies to the node's client.
pub fn required_version(resolved: &ResolvedVersions, is_firedancer: bool) -> &str {
    if is_firedancer {
        &resolved.firedancer_min_version
    } else {
        &resolved.agave_min_version
    }
}

/// Compares `version` against the requirement in `resolved`.
pub fn judge(
    check: ComplianceCheck,
    version: &str,
    cluster: &str,
    is_firedancer: bool,
    resolved: &ResolvedVersions,
) -> ComplianceVerdict {
    let required = required_version(resolved, is_firedancer);
    ComplianceVerdict {
        check,
        below_required: compare_versions(version, required) == Ordering::Less,
        version: version.to_string(),
        required_version: required.to_string(),
        cluster: cluster.to_string(),
        epoch: resolved.epoch,
        is_firedancer,
    }
}

/// Why no verdict could be produced. The compliance families emit nothing
/// in that case; the reason is only logged.
#[derive(Error, Debug)]
pub enum ComplianceSkip<'a> {
    #[error("failed to get version: {0}")]
    VersionUnavailable(&'a ExporterError),

    #[error("failed to get cluster: {0}")]
    ClusterUnavailable(&'a ExporterError),

    #[error("failed to resolve {kind} epoch minimum version: {source}")]
    Unresolved {
        kind: EpochKind,
        source: ExporterError,
    },
}

/// Produces compliance verdicts from node facts and the authority cache.
pub struct ComplianceEvaluator {
    authority: Arc<VersionAuthorityCache>,
}

impl ComplianceEvaluator {
    pub fn new(authority: Arc<VersionAuthorityCache>) -> Self {
        Self { authority }
    }

    /// Evaluates `check` for the node described by `facts`.
    ///
    /// Skips when the version or cluster is unknown or the requirement cannot
    /// be resolved.
    pub async fn evaluate<'a>(
        &self,
        check: ComplianceCheck,
        facts: &'a NodeFacts,
    ) -> std::result::Result<ComplianceVerdict, ComplianceSkip<'a>> {
        let version = facts.version.as_ref().map_err(ComplianceSkip::VersionUnavailable)?;
        let cluster = facts.cluster.as_ref().map_err(ComplianceSkip::ClusterUnavailable)?;

        let kind = check.epoch_kind();
        let resolved = self
            .authority
            .resolve(cluster, kind)
            .await
            .map_err(|source| ComplianceSkip::Unresolved { kind, source })?;
        let verdict = judge(check, version, cluster, facts.is_firedancer, &resolved);

        info!(
            check = ?check,
            version = %verdict.version,
            required_version = %verdict.required_version,
            cluster = %verdict.cluster,
            epoch = verdict.epoch,
            is_firedancer = verdict.is_firedancer,
            below_required = verdict.below_required,
            "compliance evaluated"
        );
        Ok(verdict)
    }
}
