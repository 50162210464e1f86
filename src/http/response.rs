//! Response handling.
//!
//! # Responsibilities
//! - Relay the upstream body unchanged
//! - Map every failure category to a fixed status code
//!
//! # Status Mapping
//! | Failure                              | Status |
//! |--------------------------------------|--------|
//! | missing/empty `apiUrl`               | 400    |
//! | invalid URL, transport, body, status | 502    |
//! | upstream timeout                     | 504    |
//!
//! Clients only ever see a generic message; the underlying error is logged.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::fetch::{FetchError, FetchedBody};

const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Errors surfaced by the relay endpoint.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required query parameter was absent or empty.
    #[error("missing required query parameter `{0}`")]
    MissingParameter(&'static str),

    /// The outbound call failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl RelayError {
    /// Status code returned to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            RelayError::Fetch(FetchError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Fetch(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::MissingParameter(_) => self.to_string(),
            RelayError::Fetch(FetchError::Timeout) => "upstream request timed out".to_string(),
            RelayError::Fetch(FetchError::Status(_)) => {
                "upstream returned an error status".to_string()
            }
            RelayError::Fetch(_) => "upstream request failed".to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}

impl IntoResponse for FetchedBody {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .and_then(|v| HeaderValue::from_str(&v).ok())
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}
