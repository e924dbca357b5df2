//! Market history fetchers
//!
//! A [`HistorySource`] performs exactly one request per call and reports the
//! outcome; retrying, pacing and concurrency limiting live in
//! [`throttled::ThrottledFetcher`], which works against any source.

use crate::identifier::ItemId;
use async_trait::async_trait;
use serde_json::Value;

pub mod albion_http;
pub mod history_parser;
pub mod retry_formatter;
pub mod throttled;

pub use throttled::{FetchExhausted, FetchOutcome, ThrottledFetcher};

/// Fetcher errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetcherError {
    /// Non-success HTTP status other than 429
    #[error("HTTP error {status}: {message}")]
    HttpError {
        /// Response status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// HTTP 429
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Transport failure (connect, DNS, reset)
    #[error("network error: {0}")]
    NetworkError(String),

    /// Request exceeded the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Response body could not be interpreted
    #[error("parse error: {0}")]
    ParseError(String),

    /// Client could not be constructed
    #[error("client configuration error: {0}")]
    ClientError(String),
}

impl FetcherError {
    /// Whether the error is a 429 and calls for the throttle backoff.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimitExceeded)
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// One-shot access to the per-item history endpoint.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Issue a single history request for `item`.
    ///
    /// # Returns
    /// The decoded JSON body of a 200 response. Every other outcome is an error:
    /// [`FetcherError::RateLimitExceeded`] for 429, [`FetcherError::HttpError`]
    /// for other statuses, [`FetcherError::NetworkError`] or
    /// [`FetcherError::Timeout`] for transport failures.
    async fn fetch_history(&self, item: &ItemId) -> FetcherResult<Value>;

    /// Market location the source queries
    fn location(&self) -> &str;

    /// Endpoint description used in log messages
    fn endpoint(&self, item: &ItemId) -> String;
}
