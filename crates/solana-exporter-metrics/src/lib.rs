//! Solana Exporter Metrics
//!
//! Minimal gauge model and Prometheus text exposition used by the exporter.
//!
//! # Architecture
//!
//! - [`GaugeDesc`]: declared metric family (name, help text, label names)
//! - [`Sample`]: one observation of a family, or an invalid marker carrying
//!   the error that prevented the observation
//! - [`Collector`]: anything that can describe its families and fill a
//!   sample buffer for one scrape
//! - [`encode_text`]: loads the samples into a per-scrape `prometheus`
//!   registry and renders it with `TextEncoder`
//!
//! # Usage Example
//!
//! ```rust
//! use solana_exporter_metrics::{encode_text, GaugeDesc};
//!
//! let desc = GaugeDesc::new("solana_node_is_healthy", "Whether the node is healthy", &[]);
//! let samples = vec![desc.sample(1.0, &[] as &[&str])];
//!
//! let body = encode_text(&[desc], &samples).unwrap();
//! assert!(body.contains("solana_node_is_healthy 1\n"));
//! ```
//!
//! # Invalid samples
//!
//! A step that fails still reports the failure for every family it owns. The
//! encoder appends such a sample as `# ERROR <name> <message>`, which
//! Prometheus ignores as a comment, so one failing family never breaks the
//! scrape of the others.

mod collector;
mod desc;
mod encoder;
mod sample;

pub use collector::Collector;
pub use desc::GaugeDesc;
pub use encoder::{encode_text, EncodeError, EncodeResult, TEXT_CONTENT_TYPE};
pub use sample::Sample;
