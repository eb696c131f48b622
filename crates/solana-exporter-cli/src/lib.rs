// Copyright 2025 Solana Exporter Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Solana Exporter CLI
//!
//! Command-line flags for the `solana-exporter` binary and their translation
//! into an [`ExporterConfig`].
//!
//! ## Usage
//!
//! ```bash
//! # Track one validator against a local RPC node
//! solana-exporter --rpc-url http://127.0.0.1:8899 --nodekey <identity>
//!
//! # Minimal mode for RPC-only nodes
//! solana-exporter --light-mode --listen-address 0.0.0.0:9179
//! ```
//!
//! All URLs must include the `http://` or `https://` prefix.

use argh::FromArgs;
use solana_exporter_collector::authority::DEFAULT_AUTHORITY_URL;
use solana_exporter_collector::config::{DEFAULT_LISTEN_ADDRESS, DEFAULT_RPC_URL};
use solana_exporter_collector::ExporterConfig;
use solana_exporter_common::error::{ExporterError, Result};
use std::net::SocketAddr;
use std::time::Duration;


fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_listen_address() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}

fn default_authority_url() -> String {
    DEFAULT_AUTHORITY_URL.to_string()
}

#[derive(FromArgs, Debug)]
/// Prometheus exporter for Solana validator health and version compliance
pub struct Args {
    /// solana JSON-RPC endpoint of the monitored node
    #[argh(option, long = "rpc-url", default = "default_rpc_url()")]
    pub rpc_url: String,

    /// address to serve /metrics on
    #[argh(option, long = "listen-address", default = "default_listen_address()")]
    pub listen_address: String,

    /// validator identity to track vote accounts and balances for (repeatable)
    #[argh(option, long = "nodekey")]
    pub node_keys: Vec<String>,

    /// vote account whose balance is reported (repeatable)
    #[argh(option, long = "votekey")]
    pub vote_keys: Vec<String>,

    /// additional account whose balance is reported (repeatable)
    #[argh(option, long = "balance-address")]
    pub balance_addresses: Vec<String>,

    /// report every vote account in the cluster instead of only --nodekey ones
    #[argh(switch, long = "comprehensive-vote-account-tracking")]
    pub comprehensive_vote_account_tracking: bool,

    /// skip vote account and balance collection
    #[argh(switch, long = "light-mode")]
    pub light_mode: bool,

    /// identity expected to be voting; enables solana_node_is_active
    #[argh(option, long = "active-identity")]
    pub active_identity: Option<String>,

    /// timeout in seconds for outbound HTTP requests
    #[argh(option, long = "http-timeout", default = "60")]
    pub http_timeout_secs: u64,

    /// deadline in seconds for one scrape of /metrics
    #[argh(option, long = "scrape-timeout", default = "30")]
    pub scrape_timeout_secs: u64,

    /// base URL of the minimum-version authority
    #[argh(option, long = "authority-url", default = "default_authority_url()")]
    pub authority_url: String,

    /// seconds a resolved minimum version stays cached
    #[argh(option, long = "authority-cache-ttl", default = "21600")]
    pub authority_cache_ttl_secs: u64,

    /// firedancer metrics endpoint to probe (defaults to port 7999 on the RPC host)
    #[argh(option, long = "firedancer-metrics-url")]
    pub firedancer_metrics_url: Option<String>,
}

impl Args {
    /// Builds and validates the exporter configuration.
    pub fn into_config(self) -> Result<ExporterConfig> {
        let config = ExporterConfig {
            rpc_url: self.rpc_url,
            listen_address: self.listen_address,
            node_keys: self.node_keys,
            vote_keys: self.vote_keys,
            balance_addresses: self.balance_addresses,
            comprehensive_vote_account_tracking: self.comprehensive_vote_account_tracking,
            light_mode: self.light_mode,
            active_identity: self.active_identity,
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            scrape_timeout: Duration::from_secs(self.scrape_timeout_secs),
            authority_url: self.authority_url,
            authority_cache_ttl: Duration::from_secs(self.authority_cache_ttl_secs),
            firedancer_metrics_url: self.firedancer_metrics_url,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parses the listen address.
pub fn parse_listen_address(addr: &str) -> Result<SocketAddr> {
    addr.parse().map_err(|e| {
        ExporterError::InvalidConfig(format!("invalid listen address '{}': {}", addr, e))
    })
}
