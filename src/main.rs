//! fetch-relay
//!
//! Single-endpoint HTTP relay built with Tokio and Axum.
//!
//! ```text
//!   Client                        fetch-relay                         Upstream
//!     │  GET /fetchData?apiUrl=U     │                                  │
//!     │─────────────────────────────▶│  http::server (request id, trace)│
//!     │                              │  http::request (require apiUrl)  │
//!     │                              │  fetch::client ── GET U ────────▶│
//!     │                              │                ◀── body ─────────│
//!     │◀──── 200 body | 4xx | 5xx ───│  http::response (error → status) │
//! ```

use std::path::PathBuf;

use clap::Parser;

use fetch_relay::config::{read_config, validate_config, ConfigError, RelayConfig};
use fetch_relay::observability::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "fetch-relay")]
#[command(about = "Relays GET /fetchData?apiUrl=<url> to the given URL", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Listen port, overrides the port of the bind address.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

impl Cli {
    fn into_config(self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.listener.set_port(port);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = ?config.upstream.timeout_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    fetch_relay::lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
