//! Startup orchestration.
//!
//! # Order
//! 1. Build the outbound client
//! 2. Start the metrics endpoint (if enabled)
//! 3. Bind the listener last, so traffic only arrives when ready
//!
//! Any startup error is fatal.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{Shutdown, ShutdownSignal};
use crate::lifecycle::signals::wait_for_shutdown_signal;
use crate::observability::metrics;

/// Errors that abort startup or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// A relay with its listener bound, ready to serve.
pub struct Relay {
    server: HttpServer,
    listener: TcpListener,
}

impl Relay {
    /// Initialize subsystems and bind the listener.
    pub async fn bind(config: RelayConfig) -> Result<Self, StartupError> {
        Self::bind_server(HttpServer::new(config)?).await
    }

    /// Same as [`Relay::bind`] for a server built elsewhere, e.g. around a
    /// custom [`Fetcher`](crate::fetch::Fetcher).
    pub async fn bind_server(server: HttpServer) -> Result<Self, StartupError> {
        let config = server.config();

        if config.observability.metrics_enabled {
            let addr: SocketAddr = config.observability.metrics_address.parse().map_err(|_| {
                StartupError::MetricsAddress(config.observability.metrics_address.clone())
            })?;
            metrics::init_metrics(addr)?;
        }

        let address = config.listener.bind_address.clone();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address, source })?;

        Ok(Self { server, listener })
    }

    /// The address actually bound (resolves port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` fires, then drain in-flight requests.
    pub async fn serve(self, shutdown: ShutdownSignal) -> Result<(), StartupError> {
        self.server
            .run(self.listener, shutdown)
            .await
            .map_err(StartupError::Serve)
    }
}

/// Bind, serve, and stop on SIGINT/SIGTERM.
pub async fn run(config: RelayConfig) -> Result<(), StartupError> {
    let relay = Relay::bind(config).await?;
    if let Ok(addr) = relay.local_addr() {
        tracing::info!(address = %addr, "Listening for connections");
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            tracing::error!(error = %e, "Failed to install signal handler");
        }
        shutdown.trigger();
    });

    relay.serve(server_shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();

        let relay = Relay::bind(config).await.unwrap();
        assert_ne!(relay.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn bind_failure_names_the_address() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".to_string();

        match Relay::bind(config).await {
            Err(StartupError::Bind { address, .. }) => assert_eq!(address, "not-an-address"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("bind unexpectedly succeeded"),
        }
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        let relay = Relay::bind(config).await.unwrap();

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(relay.serve(shutdown.subscribe()));
        shutdown.trigger();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }
}
