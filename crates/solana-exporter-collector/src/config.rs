use crate::authority::{AuthorityConfig, DEFAULT_AUTHORITY_URL, DEFAULT_CACHE_TTL};
use solana_exporter_common::error::{ExporterError, Result};
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

/// Exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub rpc_url: String,
    pub listen_address: String,
    /// Node identities whose vote accounts are reported individually.
    pub node_keys: Vec<String>,
    pub vote_keys: Vec<String>,
    pub balance_addresses: Vec<String>,
    /// Report every vote account in the cluster, not only `node_keys`.
    pub comprehensive_vote_account_tracking: bool,
    /// Skip the vote-account and balance steps.
    pub light_mode: bool,
    pub active_identity: Option<String>,
    pub http_timeout: Duration,
    /// Deadline for one `/metrics` pass.
    pub scrape_timeout: Duration,
    pub authority_url: String,
    pub authority_cache_ttl: Duration,
    /// Overrides the probe target derived from `rpc_url`.
    pub firedancer_metrics_url: Option<String>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            node_keys: Vec::new(),
            vote_keys: Vec::new(),
            balance_addresses: Vec::new(),
            comprehensive_vote_account_tracking: false,
            light_mode: false,
            active_identity: None,
            http_timeout: Duration::from_secs(60),
            scrape_timeout: Duration::from_secs(30),
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            authority_cache_ttl: DEFAULT_CACHE_TTL,
            firedancer_metrics_url: None,
        }
    }
}

impl ExporterConfig {
    /// Checks URLs, timeouts and flag combinations.
    pub fn validate(&self) -> Result<()> {
        validate_http_url("rpc url", &self.rpc_url)?;
        validate_http_url("authority url", &self.authority_url)?;
        if let Some(url) = &self.firedancer_metrics_url {
            validate_http_url("firedancer metrics url", url)?;
        }

        if self.http_timeout.is_zero() {
            return Err(invalid("http timeout must be greater than zero"));
        }
        if self.scrape_timeout.is_zero() {
            return Err(invalid("scrape timeout must be greater than zero"));
        }

        if self.light_mode {
            if !self.node_keys.is_empty() || !self.vote_keys.is_empty() {
                return Err(invalid("light mode cannot be combined with node or vote keys"));
            }
            if !self.balance_addresses.is_empty() {
                return Err(invalid("light mode cannot be combined with balance addresses"));
            }
            if self.comprehensive_vote_account_tracking {
                return Err(invalid(
                    "light mode cannot be combined with comprehensive vote account tracking",
                ));
            }
        }
        Ok(())
    }

    pub fn authority_config(&self) -> AuthorityConfig {
        AuthorityConfig {
            base_url: self.authority_url.clone(),
            cache_ttl: self.authority_cache_ttl,
            request_timeout: self.http_timeout,
        }
    }
}

/// Accepts only `http://` and `https://` URLs.
pub fn validate_http_url(what: &str, url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(&format!(
            "{what} must start with http:// or https://, got {url}"
        )))
    }
}

fn invalid(msg: &str) -> ExporterError {
    ExporterError::InvalidConfig(msg.to_string())
}
