use crate::rpc::SolanaRpc;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use solana_exporter_common::error::{ExporterError, Result};
use solana_exporter_common::protocol::{
    Commitment, ContextValue, EpochInfo, IdentityInfo, JsonRpcRequest, JsonRpcResponse,
    VersionInfo, VoteAccounts, LAMPORTS_PER_SOL,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Port the Firedancer client serves its Prometheus metrics on.
pub const FIREDANCER_METRICS_PORT: u16 = 7999;

/// JSON-RPC client for a single Solana node.
///
/// A fresh request is sent per call; `reqwest` keeps the underlying
/// connections pooled.
pub struct HttpRpcClient {
    rpc_url: String,
    firedancer_metrics_url: String,
    timeout: Duration,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Creates a client for `rpc_url`. The Firedancer probe targets the
    /// same host on port 7999 unless overridden with
    /// [`with_firedancer_metrics_url`](Self::with_firedancer_metrics_url).
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let rpc_url = rpc_url.into();
        let firedancer_metrics_url = derive_firedancer_metrics_url(&rpc_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExporterError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            rpc_url,
            firedancer_metrics_url,
            timeout,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn with_firedancer_metrics_url(mut self, url: impl Into<String>) -> Self {
        self.firedancer_metrics_url = url.into();
        self
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn firedancer_metrics_url(&self) -> &str {
        &self.firedancer_metrics_url
    }

    /// Calls `method` and decodes its `result` into `T`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        debug!(method, id, "sending rpc request");

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.network_error(method, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.network_error(method, e))?;

        let envelope: JsonRpcResponse = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ExporterError::Network(format!("{method} returned HTTP {status}")));
            }
            Err(e) => return Err(ExporterError::Decode(format!("{method}: {e}"))),
        };

        let result = envelope.into_result(method)?;
        serde_json::from_value(result).map_err(|e| ExporterError::Decode(format!("{method}: {e}")))
    }

    fn network_error(&self, method: &str, err: reqwest::Error) -> ExporterError {
        if err.is_timeout() {
            ExporterError::Network(format!(
                "{method} timed out after {}ms",
                self.timeout.as_millis()
            ))
        } else {
            ExporterError::Network(format!("{method} request failed: {err}"))
        }
    }
}

/// Replaces port and path of `rpc_url` with the Firedancer metrics endpoint.
pub fn derive_firedancer_metrics_url(rpc_url: &str) -> Result<String> {
    let mut url = Url::parse(rpc_url)
        .map_err(|e| ExporterError::InvalidConfig(format!("invalid RPC URL {rpc_url}: {e}")))?;
    url.set_port(Some(FIREDANCER_METRICS_PORT))
        .map_err(|_| ExporterError::InvalidConfig(format!("RPC URL {rpc_url} has no host")))?;
    url.set_path("/metrics");
    url.set_query(None);
    Ok(url.to_string())
}

#[async_trait]
impl SolanaRpc for HttpRpcClient {
    async fn get_epoch_info(&self, commitment: Commitment) -> Result<EpochInfo> {
        self.call("getEpochInfo", json!([{ "commitment": commitment.as_str() }]))
            .await
    }

    async fn get_version(&self) -> Result<String> {
        let info: VersionInfo = self.call("getVersion", json!([])).await?;
        Ok(info.solana_core)
    }

    async fn get_genesis_hash(&self) -> Result<String> {
        self.call("getGenesisHash", json!([])).await
    }

    async fn get_health(&self) -> Result<()> {
        // Healthy nodes answer with the literal string "ok".
        let _: String = self.call("getHealth", json!([])).await?;
        Ok(())
    }

    async fn get_vote_accounts(&self, commitment: Commitment) -> Result<VoteAccounts> {
        self.call("getVoteAccounts", json!([{ "commitment": commitment.as_str() }]))
            .await
    }

    async fn get_minimum_ledger_slot(&self) -> Result<u64> {
        self.call("minimumLedgerSlot", json!([])).await
    }

    async fn get_first_available_block(&self) -> Result<u64> {
        self.call("getFirstAvailableBlock", json!([])).await
    }

    async fn get_identity(&self) -> Result<String> {
        let info: IdentityInfo = self.call("getIdentity", json!([])).await?;
        Ok(info.identity)
    }

    async fn get_balance(&self, address: &str) -> Result<f64> {
        let balance: ContextValue<u64> = self.call("getBalance", json!([address])).await?;
        Ok(balance.value as f64 / LAMPORTS_PER_SOL)
    }

    async fn probe_firedancer(&self) -> Result<u16> {
        let response = self
            .http
            .get(&self.firedancer_metrics_url)
            .send()
            .await
            .map_err(|e| self.network_error("firedancer probe", e))?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_firedancer_metrics_url() {
        let url = derive_firedancer_metrics_url("http://127.0.0.1:8899").unwrap();
        assert_eq!(url, "http://127.0.0.1:7999/metrics");

        let url = derive_firedancer_metrics_url("https://rpc.example.com/path?x=1").unwrap();
        assert_eq!(url, "https://rpc.example.com:7999/metrics");
    }

    #[test]
    fn test_derive_rejects_invalid_url() {
        assert!(matches!(
            derive_firedancer_metrics_url("not a url"),
            Err(ExporterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_firedancer_override() {
        let client = HttpRpcClient::new("http://127.0.0.1:8899", Duration::from_secs(1))
            .unwrap()
            .with_firedancer_metrics_url("http://10.0.0.1:9000/metrics");
        assert_eq!(client.firedancer_metrics_url(), "http://10.0.0.1:9000/metrics");
        assert_eq!(client.rpc_url(), "http://127.0.0.1:8899");
    }
}
