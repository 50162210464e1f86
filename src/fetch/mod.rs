//! Outbound fetcher subsystem.
//!
//! # Data Flow
//! ```text
//! apiUrl string
//!     → client.rs (parse URL, single GET, status check, decode body)
//!     → FetchedBody | FetchError (error.rs)
//! ```

pub mod client;
pub mod error;

pub use client::{parse_target, FetchedBody, Fetcher, ReqwestFetcher};
pub use error::{FetchError, FetchResult};
