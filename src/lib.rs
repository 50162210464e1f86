//! Single-endpoint HTTP relay.
//!
//! `GET /fetchData?apiUrl=<url>` performs one GET to `<url>` and returns the
//! upstream body unchanged.

pub mod config;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::RelayConfig;
pub use fetch::{FetchError, Fetcher, ReqwestFetcher};
pub use http::HttpServer;
pub use lifecycle::{Relay, Shutdown};
