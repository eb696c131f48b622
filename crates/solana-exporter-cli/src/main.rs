//! # Solana Exporter Entry Point
//!
//! Parses flags, builds the RPC client and collector, and serves `/metrics`
//! until the process is stopped.

use anyhow::Result;
use solana_exporter_cli::{parse_listen_address, Args};
use solana_exporter_client::HttpRpcClient;
use solana_exporter_collector::{HttpServer, SolanaCollector};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let config = args.into_config()?;
    let addr = parse_listen_address(&config.listen_address)?;

    tracing::info!("Monitoring RPC node at {}", config.rpc_url);
    tracing::info!("Minimum versions from {}", config.authority_url);
    if config.light_mode {
        tracing::info!("Light mode enabled, skipping vote account and balance collection");
    }
    if !config.node_keys.is_empty() {
        tracing::info!("Tracking {} node key(s)", config.node_keys.len());
    }

    let mut client = HttpRpcClient::new(config.rpc_url.clone(), config.http_timeout)?;
    if let Some(url) = &config.firedancer_metrics_url {
        client = client.with_firedancer_metrics_url(url.clone());
    }
    tracing::info!("Firedancer probe target: {}", client.firedancer_metrics_url());

    let scrape_timeout = config.scrape_timeout;
    let collector = SolanaCollector::from_config(Arc::new(client), Arc::new(config))?;

    HttpServer::new(Arc::new(collector), scrape_timeout)
        .run(addr)
        .await?;

    Ok(())
}
