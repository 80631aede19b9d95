//! Jikan API v4 access.
//!
//! Provides the retrying HTTP client, the endpoint URL builder and the
//! response types consumed by the page and search collaborators.

pub mod client;
pub mod endpoints;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{RawResponse, ReqwestTransport, RetryPolicy, RetryingClient, Transport};
pub use endpoints::{validate_url, Endpoints, JIKAN_BASE_URL};
pub use types::*;
