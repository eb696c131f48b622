//! Minimum-version policy published by the Solana Foundation.
//!
//! The authority publishes, per cluster, a list of records each naming the
//! minimum Agave and Firedancer versions required for one epoch.
//! [`VersionAuthorityCache`] resolves the record that governs the current or
//! the next epoch and keeps the answer for a bounded time.
//!
//! # Resolution
//!
//! For a lookup kind the cache tries each target epoch in priority order and
//! falls back to the first record the authority returned:
//!
//! | kind      | targets                |
//! |-----------|------------------------|
//! | `Current` | `current`              |
//! | `Next`    | `current + 1, current` |
//!
//! The resolved epoch is the epoch of the selected record, which may differ
//! from the requested one when the fallback applied.
//!
//! # Concurrency
//!
//! Both entries live behind one `tokio::sync::RwLock`. A miss drops the read
//! guard, fetches without holding any lock and only takes the write lock to
//! store the result. Two concurrent misses may both fetch; the stored values
//! are the same either way.

use serde::{Deserialize, Deserializer};
use solana_exporter_client::SolanaRpc;
use solana_exporter_common::error::{ExporterError, Result};
use solana_exporter_common::protocol::Commitment;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const DEFAULT_AUTHORITY_URL: &str = "https://api.solana.org/api/epoch/required_versions";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// One published policy entry.
///
/// Absent and `null` fields both decode to their empty value, so one
/// incomplete record never rejects the whole list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorityRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cluster: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub epoch: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agave_min_version: String,
    #[serde(default)]
    pub agave_max_version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firedancer_min_version: String,
    #[serde(default)]
    pub firedancer_max_version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inherited_from_prev_epoch: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct AuthorityResponse {
    #[serde(default)]
    data: Vec<AuthorityRecord>,
}

/// Which epoch a lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpochKind {
    Current,
    Next,
}

impl EpochKind {
    /// Epochs to look for, in priority order, given the node's current epoch.
    pub fn targets(self, current_epoch: u64) -> Vec<u64> {
        match self {
            EpochKind::Current => vec![current_epoch],
            EpochKind::Next => vec![current_epoch.saturating_add(1), current_epoch],
        }
    }
}

impl fmt::Display for EpochKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpochKind::Current => f.write_str("current"),
            EpochKind::Next => f.write_str("next"),
        }
    }
}

/// Minimum versions governing one epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersions {
    pub agave_min_version: String,
    pub firedancer_min_version: String,
    /// Epoch of the record the versions came from.
    pub epoch: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    versions: ResolvedVersions,
    fetched_at: Instant,
}

/// Authority endpoint and cache settings.
#[derive(Debug, Clone)]
pub struct AuthorityConfig {
    pub base_url: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AUTHORITY_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Picks the record governing `kind` relative to `current_epoch`.
pub fn select_record(
    records: &[AuthorityRecord],
    kind: EpochKind,
    current_epoch: u64,
) -> Option<&AuthorityRecord> {
    kind.targets(current_epoch)
        .into_iter()
        .find_map(|target| records.iter().find(|r| r.epoch == target))
        .or_else(|| records.first())
}

pub struct VersionAuthorityCache {
    http: reqwest::Client,
    config: AuthorityConfig,
    rpc: Arc<dyn SolanaRpc>,
    entries: RwLock<HashMap<EpochKind, CacheEntry>>,
}

impl VersionAuthorityCache {
    pub fn new(rpc: Arc<dyn SolanaRpc>, config: AuthorityConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ExporterError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            rpc,
            entries: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the minimum versions for `kind` on `cluster`.
    ///
    /// A fresh cached entry is returned without any network call. Otherwise
    /// the record list is fetched, the current epoch is read from the node
    /// and the selected record replaces the entry. A failed resolve leaves
    /// the previous entry in place.
    pub async fn resolve(&self, cluster: &str, kind: EpochKind) -> Result<ResolvedVersions> {
        if let Some(versions) = self.cached(kind).await {
            debug!(%kind, epoch = versions.epoch, "using cached minimum versions");
            return Ok(versions);
        }

        let records = self.fetch_records(cluster).await?;

        let epoch_info = self
            .rpc
            .get_epoch_info(Commitment::Finalized)
            .await
            .map_err(ExporterError::epoch_lookup)?;

        let record = select_record(&records, kind, epoch_info.epoch).ok_or(ExporterError::NoData)?;
        if record.agave_min_version.is_empty() {
            return Err(ExporterError::MissingField("agave_min_version"));
        }

        let versions = ResolvedVersions {
            agave_min_version: record.agave_min_version.clone(),
            firedancer_min_version: record.firedancer_min_version.clone(),
            epoch: record.epoch,
        };

        info!(
            %kind,
            cluster,
            current_epoch = epoch_info.epoch,
            epoch = versions.epoch,
            agave_min_version = %versions.agave_min_version,
            firedancer_min_version = %versions.firedancer_min_version,
            "refreshed minimum required versions"
        );

        self.store(kind, versions.clone()).await;
        Ok(versions)
    }

    /// Stores `versions` for `kind` as if just fetched.
    pub async fn prime(&self, kind: EpochKind, versions: ResolvedVersions) {
        self.store(kind, versions).await;
    }

    async fn cached(&self, kind: EpochKind) -> Option<ResolvedVersions> {
        let entries = self.entries.read().await;
        entries
            .get(&kind)
            .filter(|entry| entry.fetched_at.elapsed() < self.config.cache_ttl)
            .map(|entry| entry.versions.clone())
    }

    async fn store(&self, kind: EpochKind, versions: ResolvedVersions) {
        let mut entries = self.entries.write().await;
        entries.insert(
            kind,
            CacheEntry {
                versions,
                fetched_at: Instant::now(),
            },
        );
    }

    async fn fetch_records(&self, cluster: &str) -> Result<Vec<AuthorityRecord>> {
        debug!(url = %self.config.base_url, cluster, "fetching minimum required versions");

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[("cluster", cluster)])
            .send()
            .await
            .map_err(|e| ExporterError::Network(format!("failed to fetch min required version: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::Network(format!(
                "version authority returned HTTP {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ExporterError::Network(format!("failed to read authority response: {e}")))?;

        let parsed: AuthorityResponse = serde_json::from_slice(&body)
            .map_err(|e| ExporterError::Decode(format!("failed to decode response: {e}")))?;

        if parsed.data.is_empty() {
            return Err(ExporterError::NoData);
        }
        Ok(parsed.data)
    }
}
