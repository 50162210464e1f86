//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Issue exactly one GET per call, no custom headers, no retries
//! - Keep one pooled client for the process lifetime
//! - Classify failures into [`FetchError`]
//!
//! # Design Decisions
//! - Redirects follow the client's default policy
//! - Non-2xx is an error; the upstream body is not relayed
//! - No timeout unless configured
//! - Body kept as the upstream bytes, so the forwarded charset stays accurate

use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::UpstreamConfig;
use crate::fetch::error::{FetchError, FetchResult};

/// Upstream response body plus the content type it was served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// Something that can GET a URL and return its body.
///
/// The relay handler depends only on this trait, so tests can inject a stub.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<FetchedBody>>;
}

/// [`Fetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Build the client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get(&self, raw: &str) -> FetchResult<FetchedBody> {
        let url = parse_target(raw)?;

        tracing::debug!(url = %url, "Fetching upstream");

        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Body(e)
            }
        })?;

        tracing::debug!(status = %status, bytes = body.len(), "Upstream responded");

        Ok(FetchedBody { body, content_type })
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<FetchedBody>> {
        Box::pin(self.get(url))
    }
}

/// Parse the caller-supplied string into a URL the client can request.
pub fn parse_target(raw: &str) -> FetchResult<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(e)
    }
}
