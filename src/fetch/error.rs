//! Outbound fetch error definitions.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while fetching an upstream URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target string is not an absolute URL.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL parsed but uses a scheme the client cannot speak.
    #[error("unsupported URL scheme `{0}`")]
    UnsupportedScheme(String),

    /// DNS failure, refused connection, TLS failure, redirect loop.
    #[error("upstream connection failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The configured upstream timeout elapsed.
    #[error("upstream request timed out")]
    Timeout,

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned status {0}")]
    Status(StatusCode),

    /// The response head arrived but the body could not be read.
    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::UnsupportedScheme(_) => "unsupported_scheme",
            FetchError::Transport(_) => "transport",
            FetchError::Timeout => "timeout",
            FetchError::Status(_) => "status",
            FetchError::Body(_) => "body",
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
