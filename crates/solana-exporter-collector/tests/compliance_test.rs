//! Compliance Evaluation Tests
//!
//! Drives `ComplianceEvaluator` through a real `VersionAuthorityCache`
//! backed by an in-process authority server, covering the epoch fallback as
//! the compliance signals see it.

mod fake_authority;

use fake_authority::{FakeAuthority, THREE_EPOCHS, TWO_EPOCHS};
use solana_exporter_client::MockRpc;
use solana_exporter_collector::{
    AuthorityConfig, ComplianceCheck, ComplianceEvaluator, NodeFacts, VersionAuthorityCache,
};
use std::sync::Arc;
use std::time::Duration;

fn evaluator(authority: &FakeAuthority) -> ComplianceEvaluator {
    let rpc = MockRpc::new();
    rpc.set_epoch(797);
    let config = AuthorityConfig {
        base_url: authority.url(),
        cache_ttl: Duration::from_secs(3600),
        request_timeout: Duration::from_secs(2),
    };
    let cache = VersionAuthorityCache::new(Arc::new(rpc), config).unwrap();
    ComplianceEvaluator::new(Arc::new(cache))
}

fn node(version: &str, is_firedancer: bool) -> NodeFacts {
    NodeFacts {
        version: Ok(version.to_string()),
        is_firedancer,
        cluster: Ok("mainnet-beta".to_string()),
    }
}

#[tokio::test]
async fn test_no_next_epoch_record_falls_back_to_current() {
    let authority = FakeAuthority::start(TWO_EPOCHS).await;
    let evaluator = evaluator(&authority);

    let verdict = evaluator
        .evaluate(ComplianceCheck::NeedsUpdate, &node("2.2.15", false))
        .await
        .unwrap();
    assert!(!verdict.below_required);
    assert_eq!(verdict.required_version, "2.2.15");
    assert_eq!(verdict.epoch, 797);
}

#[tokio::test]
async fn test_next_epoch_record_requires_update() {
    let authority = FakeAuthority::start(THREE_EPOCHS).await;
    let evaluator = evaluator(&authority);

    let verdict = evaluator
        .evaluate(ComplianceCheck::NeedsUpdate, &node("2.2.15", false))
        .await
        .unwrap();
    assert!(verdict.below_required);
    assert_eq!(verdict.required_version, "2.2.16");
    assert_eq!(verdict.epoch, 798);
}

#[tokio::test]
async fn test_firedancer_node_checked_against_firedancer_minimum() {
    let authority = FakeAuthority::start(THREE_EPOCHS).await;
    let evaluator = evaluator(&authority);

    let verdict = evaluator
        .evaluate(ComplianceCheck::Outdated, &node("0.503.20214", true))
        .await
        .unwrap();
    assert!(verdict.below_required);
    assert_eq!(verdict.required_version, "0.503.20215");
    assert!(verdict.is_firedancer);
}
