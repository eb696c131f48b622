//! In-process stand-in for the Solana Foundation version authority.
//!
//! Serves a configurable status and body on every request, counts hits and
//! records the query string of the last request.

#![allow(dead_code)]

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const AUTHORITY_PATH: &str = "/api/epoch/required_versions";

/// Records for epochs 796, 797 and 798 on mainnet-beta.
pub const THREE_EPOCHS: &str = r#"{"data":[
    {"cluster":"mainnet-beta","epoch":796,"agave_min_version":"2.2.14","agave_max_version":null,
     "firedancer_min_version":"0.503.20214","firedancer_max_version":null,"inherited_from_prev_epoch":false},
    {"cluster":"mainnet-beta","epoch":797,"agave_min_version":"2.2.15","agave_max_version":null,
     "firedancer_min_version":"0.503.20215","firedancer_max_version":null,"inherited_from_prev_epoch":false},
    {"cluster":"mainnet-beta","epoch":798,"agave_min_version":"2.2.16","agave_max_version":null,
     "firedancer_min_version":"0.503.20216","firedancer_max_version":null,"inherited_from_prev_epoch":true}
]}"#;

/// Records for epochs 796 and 797 only.
pub const TWO_EPOCHS: &str = r#"{"data":[
    {"cluster":"mainnet-beta","epoch":796,"agave_min_version":"2.2.14","firedancer_min_version":"0.503.20214"},
    {"cluster":"mainnet-beta","epoch":797,"agave_min_version":"2.2.15","firedancer_min_version":"0.503.20215"}
]}"#;

struct Reply {
    status: StatusCode,
    body: String,
}

pub struct FakeAuthority {
    addr: String,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<String>>>,
    reply: Arc<Mutex<Reply>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeAuthority {
    pub async fn start(body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let hits = Arc::new(AtomicUsize::new(0));
        let last_query = Arc::new(Mutex::new(None));
        let reply = Arc::new(Mutex::new(Reply {
            status: StatusCode::OK,
            body: body.to_string(),
        }));

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();

        let (server_hits, server_query, server_reply) = (hits.clone(), last_query.clone(), reply.clone());
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        let Ok((stream, _)) = result else { continue };
                        let io = TokioIo::new(stream);
                        let (hits, query, reply) =
                            (server_hits.clone(), server_query.clone(), server_reply.clone());

                        tokio::spawn(async move {
                            let service = service_fn(move |req: Request<Incoming>| {
                                let (hits, query, reply) = (hits.clone(), query.clone(), reply.clone());
                                async move {
                                    hits.fetch_add(1, Ordering::SeqCst);
                                    let status = if req.uri().path() == AUTHORITY_PATH {
                                        *query.lock().unwrap() = req.uri().query().map(str::to_string);
                                        None
                                    } else {
                                        Some(StatusCode::NOT_FOUND)
                                    };
                                    let reply = reply.lock().unwrap();
                                    Ok::<_, hyper::Error>(
                                        Response::builder()
                                            .status(status.unwrap_or(reply.status))
                                            .header("Content-Type", "application/json")
                                            .body(Full::new(Bytes::from(reply.body.clone())))
                                            .unwrap(),
                                    )
                                }
                            });

                            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                                eprintln!("Server error: {}", err);
                            }
                        });
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            hits,
            last_query,
            reply,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Full authority URL, including the path the exporter queries.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, AUTHORITY_PATH)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    pub fn set_reply(&self, status: StatusCode, body: &str) {
        let mut reply = self.reply.lock().unwrap();
        reply.status = status;
        reply.body = body.to_string();
    }
}

impl Drop for FakeAuthority {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
