//! Status checking.
//!
//! # Responsibilities
//! - Issue one HTTP request per check
//! - Report the status code, or why no status was obtained
//!
//! # Design Decisions
//! - No retries; a failed request counts as one failed check
//! - Redirects are either followed normally or rejected with an error,
//!   never returned as a 3xx status
//! - Every request has a deadline

pub mod http;

use async_trait::async_trait;
use reqwest::Method;
use thiserror::Error;

pub use http::HttpChecker;

/// Fixed user agent sent with every probe.
pub const USER_AGENT: &str = concat!("url-sentry v", env!("CARGO_PKG_VERSION"));

/// Reasons a check produced no status code.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The target answered with a redirect and redirects are disabled for it.
    #[error("Redirects not allowed: {url}")]
    RedirectNotAllowed { url: String },

    /// No response within the request deadline.
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// The request could not be built (bad URL or method).
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    /// DNS, TCP, TLS or protocol failure.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Probes a URL and returns the HTTP status code.
#[async_trait]
pub trait StatusChecker: Send + Sync {
    async fn check(&self, method: Method, url: &str, follow_redirects: bool) -> Result<u16, CheckError>;
}
