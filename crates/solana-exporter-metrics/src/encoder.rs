use crate::desc::GaugeDesc;
use crate::sample::Sample;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::fmt::Write;
use thiserror::Error;
use tracing::warn;

/// Content type of the Prometheus text exposition format.
pub const TEXT_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Errors that can occur while rendering a scrape.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A descriptor was rejected by the registry (bad name, empty help,
    /// duplicate family).
    #[error("failed to register metric family: {0}")]
    Registration(#[from] prometheus::Error),

    #[error("failed to encode metrics: {0}")]
    Encoding(String),
}

pub type EncodeResult<T> = Result<T, EncodeError>;

/// Renders one scrape in the Prometheus text format.
///
/// Every descriptor becomes a `GaugeVec` in a registry that lives only for
/// this call, so series from earlier scrapes never linger. Families without
/// samples are omitted. Invalid samples are appended as
/// `# ERROR <name> <message>` comment lines after the families.
pub fn encode_text(descs: &[GaugeDesc], samples: &[Sample]) -> EncodeResult<String> {
    let registry = Registry::new();
    let mut families = HashMap::with_capacity(descs.len());
    for desc in descs {
        let gauge = GaugeVec::new(Opts::new(desc.name(), desc.help()), desc.labels())?;
        registry.register(Box::new(gauge.clone()))?;
        families.insert(desc.name(), gauge);
    }

    let mut errors = String::new();
    for sample in samples {
        let Some(family) = families.get(sample.name()) else {
            warn!(metric = sample.name(), "dropping sample of undeclared family");
            continue;
        };

        match sample {
            Sample::Gauge { name, labels, value } => {
                let values: Vec<&str> = labels.iter().map(|(_, v)| v.as_str()).collect();
                match family.get_metric_with_label_values(values.as_slice()) {
                    Ok(gauge) => gauge.set(*value),
                    Err(err) => warn!(metric = *name, "dropping sample: {err}"),
                }
            }
            Sample::Invalid { name, error } => {
                let _ = writeln!(errors, "# ERROR {} {}", name, error.replace('\n', " "));
            }
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .map_err(|e| EncodeError::Encoding(e.to_string()))?;
    let mut body = String::from_utf8(buffer).map_err(|e| EncodeError::Encoding(e.to_string()))?;
    body.push_str(&errors);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_render_with_help_and_type() {
        let first = GaugeDesc::new("solana_cluster_active_stake", "Total active stake", &[]);
        let second = GaugeDesc::new("solana_cluster_validator_count", "Validator count", &["state"]);
        let samples = vec![
            second.sample(5.0, &["current"]),
            first.sample(1.0, &[] as &[&str]),
            second.sample(2.0, &["delinquent"]),
        ];

        let body = encode_text(&[first, second], &samples).unwrap();
        assert_eq!(
            body,
            "# HELP solana_cluster_active_stake Total active stake\n\
             # TYPE solana_cluster_active_stake gauge\n\
             solana_cluster_active_stake 1\n\
             # HELP solana_cluster_validator_count Validator count\n\
             # TYPE solana_cluster_validator_count gauge\n\
             solana_cluster_validator_count{state=\"current\"} 5\n\
             solana_cluster_validator_count{state=\"delinquent\"} 2\n"
        );
    }

    #[test]
    fn test_empty_family_is_omitted() {
        let desc = GaugeDesc::new("solana_node_is_active", "Active", &["identity"]);
        assert_eq!(encode_text(&[desc], &[]).unwrap(), "");
    }

    #[test]
    fn test_labels_render_sorted_by_name() {
        let desc = GaugeDesc::new("solana_node_version", "Version", &["version", "is_firedancer"]);
        let samples = vec![desc.sample(1.0, &["2.2.15", "0"])];
        let body = encode_text(&[desc], &samples).unwrap();
        assert!(body.contains("solana_node_version{is_firedancer=\"0\",version=\"2.2.15\"} 1\n"));
    }

    #[test]
    fn test_label_values_are_escaped() {
        let desc = GaugeDesc::new("solana_node_version", "Version", &["version"]);
        let samples = vec![desc.sample(1.0, &["a\"b\\c\nd"])];
        let body = encode_text(&[desc], &samples).unwrap();
        assert!(body.contains(r#"solana_node_version{version="a\"b\\c\nd"} 1"#));
    }

    #[test]
    fn test_invalid_sample_renders_as_comment() {
        let desc = GaugeDesc::new("solana_node_is_healthy", "Healthy", &[]);
        let samples = vec![desc.invalid(&"rpc failed:\nconnection refused")];
        let body = encode_text(&[desc], &samples).unwrap();
        assert_eq!(body, "# ERROR solana_node_is_healthy rpc failed: connection refused\n");
    }

    #[test]
    fn test_large_values_render_as_integers() {
        let desc = GaugeDesc::new("solana_cluster_root_slot", "Root slot", &[]);
        let samples = vec![desc.sample(347_000_000.0, &[] as &[&str])];
        let body = encode_text(&[desc], &samples).unwrap();
        assert!(body.contains("solana_cluster_root_slot 347000000\n"));
    }

    #[test]
    fn test_undeclared_sample_is_dropped() {
        let declared = GaugeDesc::new("solana_node_is_healthy", "Healthy", &[]);
        let stray = GaugeDesc::new("solana_stray", "Not declared", &[]);
        let samples = vec![stray.sample(1.0, &[] as &[&str]), stray.invalid(&"lost")];
        assert_eq!(encode_text(&[declared], &samples).unwrap(), "");
    }

    #[test]
    fn test_duplicate_family_is_rejected() {
        let desc = GaugeDesc::new("solana_node_is_healthy", "Healthy", &[]);
        let err = encode_text(&[desc.clone(), desc], &[]).unwrap_err();
        assert!(matches!(err, EncodeError::Registration(_)));
    }
}
