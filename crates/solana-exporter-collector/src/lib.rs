//! Solana Exporter Collector
//!
//! Version-compliance monitoring for a Solana validator, exposed as
//! Prometheus gauges.
//!
//! # Components
//!
//! - [`version`]: dot-separated version comparison
//! - [`authority`]: TTL-bounded cache of the minimum versions published by
//!   the Solana Foundation, resolved for the current and the next epoch
//! - [`compliance`]: turns node facts and resolved minimums into the
//!   `outdated` / `needs_update` signals
//! - [`collector`]: the per-scrape pass over every collection step, each
//!   isolated from the others' failures
//! - [`http_server`]: axum server exposing `/metrics`

pub mod authority;
pub mod collector;
pub mod compliance;
pub mod config;
pub mod descriptors;
pub mod http_server;
pub mod version;

pub use authority::{AuthorityConfig, AuthorityRecord, EpochKind, ResolvedVersions, VersionAuthorityCache};
pub use collector::SolanaCollector;
pub use compliance::{ComplianceCheck, ComplianceEvaluator, ComplianceVerdict, NodeFacts};
pub use config::ExporterConfig;
pub use descriptors::Descriptors;
pub use http_server::HttpServer;
pub use version::{compare_versions, version_to_number};
