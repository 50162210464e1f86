//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Request},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

use fetch_relay::config::RelayConfig;
use fetch_relay::fetch::ReqwestFetcher;
use fetch_relay::{HttpServer, Relay, Shutdown};

/// Same shape as `https://jsonplaceholder.typicode.com/posts/1`.
pub const POST_FIXTURE: &str = r#"{
  "userId": 1,
  "id": 1,
  "title": "sunt aut facere repellat provident occaecati excepturi optio reprehenderit",
  "body": "quia et suscipit\nsuscipit recusandae consequuntur expedita et cum\nreprehenderit molestiae ut ut quas totam\nnostrum rerum est autem sunt rem eveniet architecto"
}"#;

/// Text with multi-byte characters and mixed line endings.
pub const TEXT_FIXTURE: &str = "plain text · ünïcödé ✓\r\n  indented line\n\ttab\n";

/// "café" in ISO-8859-1.
pub const LATIN1_FIXTURE: &[u8] = b"caf\xE9";

/// Bytes that are not valid UTF-8.
pub const BINARY_FIXTURE: &[u8] = &[0xFF, 0xFE, 0x00, 0x80, 0xC3];

/// A local upstream serving fixed documents.
#[allow(dead_code)]
pub struct Upstream {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl Upstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start the fixture upstream on an ephemeral port.
pub async fn start_upstream() -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new()
        .route("/posts/1", get(post))
        .route("/text", get(|| async { TEXT_FIXTURE }))
        .route("/untyped", get(untyped))
        .route("/latin1", get(latin1))
        .route("/binary", get(binary))
        .route("/status/{code}", get(status))
        .route("/redirect", get(|| async { Redirect::temporary("/posts/1") }))
        .route("/slow", get(slow))
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                next.run(req).await
            }
        }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Upstream { addr, hits }
}

async fn post() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        POST_FIXTURE,
    )
}

async fn untyped() -> Response {
    Response::new(Body::from("no content type here"))
}

async fn latin1() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")],
        LATIN1_FIXTURE,
    )
}

async fn binary() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        BINARY_FIXTURE,
    )
}

async fn status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, "upstream failure detail: stack trace here").into_response()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "late"
}

/// A fetcher that ignores proxy environment variables.
#[allow(dead_code)]
pub fn direct_fetcher(timeout: Option<Duration>) -> ReqwestFetcher {
    let mut builder = reqwest::Client::builder().no_proxy();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    ReqwestFetcher::from_client(builder.build().unwrap())
}

/// A relay under test and its shutdown handle.
#[allow(dead_code)]
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl RunningRelay {
    pub fn fetch_data_url(&self) -> String {
        format!("http://{}/fetchData", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a relay on an ephemeral port with the given fetcher timeout.
#[allow(dead_code)]
pub async fn start_relay(timeout: Option<Duration>) -> RunningRelay {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let server = HttpServer::with_fetcher(config, Arc::new(direct_fetcher(timeout)));
    let relay = Relay::bind_server(server).await.unwrap();
    let addr = relay.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = relay.serve(server_shutdown).await;
    });

    RunningRelay { addr, shutdown }
}

/// Client for talking to the relay itself.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
