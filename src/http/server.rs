//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay and health routes
//! - Wire up middleware (request ID, tracing)
//! - Hold the shared fetcher and hand it to handlers
//! - Serve until shutdown is signalled

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::fetch::{FetchedBody, Fetcher, ReqwestFetcher};
use crate::http::request::{request_id_of, FetchParams, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::RelayError;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::metrics;

/// Path of the relay endpoint.
pub const FETCH_DATA_PATH: &str = "/fetchData";

/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn Fetcher>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server with a reqwest-backed fetcher built from `config`.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let fetcher = ReqwestFetcher::new(&config.upstream)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a server around an explicit fetcher.
    pub fn with_fetcher(config: RelayConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let router = build_router(AppState { fetcher });
        Self { router, config }
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID));

    Router::new()
        .route(FETCH_DATA_PATH, get(fetch_data))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
        .layer(middleware)
}

/// `GET /fetchData?apiUrl=<url>`: fetch the URL and relay its body.
async fn fetch_data(
    State(state): State<AppState>,
    Query(params): Query<FetchParams>,
) -> Response {
    let start = Instant::now();

    let response = match relay(&state, &params).await {
        Ok(body) => body.into_response(),
        Err(e) => {
            if let RelayError::Fetch(ref fetch_err) = e {
                tracing::warn!(
                    api_url = params.api_url.as_deref().unwrap_or_default(),
                    kind = fetch_err.kind(),
                    error = %fetch_err,
                    "Upstream fetch failed"
                );
                metrics::record_upstream_error(fetch_err.kind());
            } else {
                tracing::debug!(error = %e, "Rejected relay request");
            }
            e.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}

async fn relay(state: &AppState, params: &FetchParams) -> Result<FetchedBody, RelayError> {
    let api_url = params.require_api_url()?;
    Ok(state.fetcher.fetch(api_url).await?)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
