//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the caller sent none
//! - Decode the relay query string
//! - Check the `apiUrl` parameter is present before any outbound call

use axum::http::{HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::RelayError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Name of the query parameter holding the upstream URL.
pub const API_URL_PARAM: &str = "apiUrl";

/// Query string of `GET /fetchData`.
///
/// The parameter is optional at the type level so that a missing value is
/// reported by [`FetchParams::require_api_url`] instead of a generic
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FetchParams {
    #[serde(rename = "apiUrl")]
    pub api_url: Option<String>,
}

impl FetchParams {
    /// The upstream URL, or a validation error if absent or empty.
    pub fn require_api_url(&self) -> Result<&str, RelayError> {
        match self.api_url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(RelayError::MissingParameter(API_URL_PARAM)),
        }
    }
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// Read the request ID header for logging.
pub fn request_id_of<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
