//! HTTP Server for the Exporter
//!
//! This module serves the Prometheus scrape endpoint using axum.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use solana_exporter_common::error::{ExporterError, Result};
use solana_exporter_metrics::{encode_text, Collector, TEXT_CONTENT_TYPE};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

struct AppState {
    collector: Arc<dyn Collector>,
    scrape_timeout: Duration,
}

/// HTTP server for the exporter.
///
/// This server:
/// - Serves the metrics exposition at `GET /metrics`
/// - Provides a health check endpoint at `GET /__health`
pub struct HttpServer {
    state: Arc<AppState>,
}

impl HttpServer {
    /// Creates a new HTTP server.
    ///
    /// # Arguments
    /// * `collector` - Source of samples, run once per scrape
    /// * `scrape_timeout` - Deadline for one pass; samples gathered before it
    ///   expires are still served
    pub fn new(collector: Arc<dyn Collector>, scrape_timeout: Duration) -> Self {
        Self {
            state: Arc::new(AppState {
                collector,
                scrape_timeout,
            }),
        }
    }

    /// Builds the axum router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(handle_metrics))
            .route("/__health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serves on an already bound listener until the server stops.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener
            .local_addr()
            .map_err(|e| ExporterError::Network(format!("Failed to get local addr: {}", e)))?;
        info!("Exporter HTTP server listening on {}", addr);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| ExporterError::Network(format!("Server error: {}", e)))
    }

    /// Binds to `addr` and serves.
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ExporterError::Network(format!("Failed to bind to {}: {}", addr, e)))?;
        self.serve(listener).await
    }
}

/// Runs one collection pass and renders whatever it produced.
async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut samples = Vec::new();

    let pass = state.collector.collect(&mut samples);
    if tokio::time::timeout(state.scrape_timeout, pass).await.is_err() {
        warn!(
            timeout_ms = state.scrape_timeout.as_millis() as u64,
            collected = samples.len(),
            "scrape timed out, serving partial results"
        );
    }

    match encode_text(&state.collector.describe(), &samples) {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], body),
        Err(err) => {
            error!("failed to render metrics: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                err.to_string(),
            )
        }
    }
}

/// Handles health check GET requests.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
