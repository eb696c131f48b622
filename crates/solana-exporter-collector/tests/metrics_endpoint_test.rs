//! `/metrics` End-to-End Tests
//!
//! Runs the full exporter stack (HTTP server, collection pass, authority
//! cache) against a `MockRpc` node and an in-process authority server, and
//! scrapes it over HTTP with reqwest.

mod fake_authority;

use fake_authority::{FakeAuthority, THREE_EPOCHS};
use solana_exporter_client::mock::GET_VOTE_ACCOUNTS;
use solana_exporter_client::MockRpc;
use solana_exporter_collector::{ExporterConfig, HttpServer, SolanaCollector};
use solana_exporter_common::protocol::{VoteAccount, VoteAccounts};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

fn node_rpc() -> Arc<MockRpc> {
    let rpc = MockRpc::new();
    rpc.set_epoch(797);
    rpc.set_version("2.2.15");
    rpc.set_identity("node1");
    rpc.set_minimum_ledger_slot(100);
    rpc.set_first_available_block(150);
    rpc.set_balance("node1", 3.0);
    rpc.set_vote_accounts(VoteAccounts {
        current: vec![VoteAccount {
            vote_pubkey: "vote1".into(),
            node_pubkey: "node1".into(),
            activated_stake: 42_000_000_000,
            last_vote: 147,
            root_slot: 18,
            ..VoteAccount::default()
        }],
        delinquent: Vec::new(),
    });
    Arc::new(rpc)
}

async fn start_exporter(rpc: Arc<MockRpc>, authority: &FakeAuthority) -> String {
    let config = Arc::new(ExporterConfig {
        node_keys: vec!["node1".into()],
        authority_url: authority.url(),
        ..ExporterConfig::default()
    });
    let collector = Arc::new(SolanaCollector::from_config(rpc, config).unwrap());
    let server = HttpServer::new(collector, Duration::from_secs(5));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener));
    format!("http://{}", addr)
}

async fn scrape(base: &str) -> String {
    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    response.text().await.unwrap()
}

#[tokio::test]
async fn test_scrape_renders_all_families() {
    let authority = FakeAuthority::start(THREE_EPOCHS).await;
    let base = start_exporter(node_rpc(), &authority).await;

    let body = scrape(&base).await;

    assert!(body.contains("# TYPE solana_node_version gauge\n"));
    assert!(body.contains("solana_node_version{is_firedancer=\"0\",version=\"2.2.15\"} 1\n"));
    assert!(body.contains("solana_node_is_healthy 1\n"));
    assert!(body.contains("solana_node_minimum_ledger_slot 100\n"));
    assert!(body.contains("solana_validator_active_stake{nodekey=\"node1\",votekey=\"vote1\"} 42\n"));
    assert!(body.contains("solana_account_balance{address=\"node1\"} 3\n"));
    assert!(body.contains(
        "solana_foundation_min_required_version{agave_min_version=\"2.2.15\",cluster=\"mainnet-beta\",\
         epoch=\"797\",firedancer_min_version=\"0.503.20215\"} 1\n"
    ));
    assert!(body.contains(
        "solana_node_outdated{cluster=\"mainnet-beta\",epoch=\"797\",is_firedancer=\"0\",\
         required_version=\"2.2.15\",version=\"2.2.15\"} 0\n"
    ));
    assert!(body.contains(
        "solana_node_needs_update{cluster=\"mainnet-beta\",epoch=\"798\",is_firedancer=\"0\",\
         required_version=\"2.2.16\",version=\"2.2.15\"} 1\n"
    ));
    assert!(!body.contains("# ERROR"));
}

#[tokio::test]
async fn test_repeated_scrapes_use_cache() {
    let authority = FakeAuthority::start(THREE_EPOCHS).await;
    let base = start_exporter(node_rpc(), &authority).await;

    scrape(&base).await;
    let hits = authority.hits();
    assert_eq!(hits, 2, "one fetch per epoch kind");

    scrape(&base).await;
    assert_eq!(authority.hits(), hits);
}

#[tokio::test]
async fn test_failed_step_is_reported_and_isolated() {
    let authority = FakeAuthority::start(THREE_EPOCHS).await;
    let rpc = node_rpc();
    rpc.fail(GET_VOTE_ACCOUNTS, "vote accounts unavailable");
    let base = start_exporter(rpc, &authority).await;

    let body = scrape(&base).await;

    assert!(body.contains("# ERROR solana_cluster_active_stake"));
    assert!(body.contains("vote accounts unavailable"));
    assert!(body.contains("solana_node_is_healthy 1\n"));
    assert!(body.contains("solana_node_identity{identity=\"node1\"} 1\n"));
    assert!(body.contains("solana_node_outdated{"));
    assert!(body.contains("solana_node_needs_update{"));
}

#[tokio::test]
async fn test_unreachable_authority_drops_compliance_only() {
    let authority = FakeAuthority::start(r#"{"data": []}"#).await;
    let base = start_exporter(node_rpc(), &authority).await;

    let body = scrape(&base).await;

    assert!(body.contains("# ERROR solana_foundation_min_required_version No data found in response"));
    assert!(!body.contains("solana_node_outdated"));
    assert!(!body.contains("solana_node_needs_update"));
    assert!(body.contains("solana_node_version{"));
}
