//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request-id + trace layers)
//!     → request.rs (decode query, require apiUrl)
//!     → fetch::Fetcher (single outbound GET)
//!     → response.rs (relay body, or map error to status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{FetchParams, MakeRequestUuid, API_URL_PARAM, X_REQUEST_ID};
pub use response::RelayError;
pub use server::{build_router, AppState, HttpServer, FETCH_DATA_PATH, HEALTH_PATH};
