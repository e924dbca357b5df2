//! Retry message formatting
//!
//! Builds the user-facing log lines emitted while an item is being retried,
//! and the summary printed once its retry budget is exhausted.

use crate::fetcher::FetcherError;
use std::time::Duration;

/// Classification of retry errors for user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryErrorType {
    /// Request exceeded the configured timeout
    NetworkTimeout,
    /// Connection refused, DNS failure, or other transport failure
    NetworkOffline,
    /// HTTP 429 rate limit exceeded
    RateLimit,
    /// HTTP 5xx server error
    ServerError(u16),
    /// HTTP 4xx other than 429
    ClientError(u16),
    /// 200 response with an unusable body
    MalformedResponse,
    /// Generic fallback when no better classification fits
    NetworkGeneric,
}

impl RetryErrorType {
    /// User-friendly description string used inside retry log messages.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "request timeout",
            Self::NetworkOffline => "connection failed",
            Self::RateLimit => "rate limit exceeded (429)",
            Self::ServerError(code) => match code {
                500 => "internal server error",
                502 => "bad gateway",
                503 => "service unavailable",
                504 => "gateway timeout",
                _ => "server error",
            },
            Self::ClientError(code) => match code {
                404 => "item not found",
                _ => "client error",
            },
            Self::MalformedResponse => "malformed response",
            Self::NetworkGeneric => "network error",
        }
    }

    /// Suggested remediation shown once an item is given up on.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "Increase --timeout-secs or check your connection",
            Self::NetworkOffline => "Verify internet connectivity and DNS resolution",
            Self::RateLimit => "Lower --concurrency or run again later",
            Self::ServerError(_) => "The data API may be degraded, try again later",
            Self::ClientError(_) => "Check that the item id exists on the market",
            Self::MalformedResponse => "The data API returned an unexpected payload",
            Self::NetworkGeneric => "Check network connectivity and try again",
        }
    }
}

impl From<&FetcherError> for RetryErrorType {
    fn from(err: &FetcherError) -> Self {
        match err {
            FetcherError::RateLimitExceeded => Self::RateLimit,
            FetcherError::HttpError { status, .. } if *status >= 500 => Self::ServerError(*status),
            FetcherError::HttpError { status, .. } => Self::ClientError(*status),
            FetcherError::Timeout(_) => Self::NetworkTimeout,
            FetcherError::NetworkError(_) => Self::NetworkOffline,
            FetcherError::ParseError(_) => Self::MalformedResponse,
            FetcherError::ClientError(_) => Self::NetworkGeneric,
        }
    }
}

/// Context for formatting retry messages.
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Attempts consumed so far (1-based)
    pub attempt: u32,
    /// Total attempts the item may consume
    pub max_attempts: u32,
    /// Type of error that triggered retry
    pub error_type: RetryErrorType,
    /// Wait before the next attempt
    pub wait: Duration,
    /// Item being fetched
    pub item: String,
    /// Original error message for details
    pub error_message: String,
    /// URL that failed
    pub endpoint: String,
}

impl RetryContext {
    /// Build a context from the error of a failed attempt.
    pub fn new(
        attempt: u32,
        max_attempts: u32,
        error: &FetcherError,
        wait: Duration,
        item: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            attempt,
            max_attempts,
            error_type: RetryErrorType::from(error),
            wait,
            item: item.into(),
            error_message: error.to_string(),
            endpoint: endpoint.into(),
        }
    }

    /// `Retrying T5_BAG (attempt 2/6) after bad gateway - waiting 0.6 seconds...`
    pub fn format_retry(&self) -> String {
        format!(
            "Retrying {} (attempt {}/{}) after {} - waiting {:.1} seconds...",
            self.item,
            self.attempt,
            self.max_attempts,
            self.error_type.description(),
            self.wait.as_secs_f64()
        )
    }

    /// Message logged when a retried item eventually succeeds.
    pub fn format_success(&self) -> String {
        format!(
            "Fetched {} on attempt {}/{}",
            self.item, self.attempt, self.max_attempts
        )
    }

    /// Multi-line summary logged when the retry budget is exhausted.
    pub fn format_failure(&self) -> String {
        let mut lines = vec![
            format!(
                "[FAILED] {} gave up after {} attempts",
                self.item, self.max_attempts
            ),
            format!("  Last error: {}", self.error_message),
            format!("  Endpoint: {}", self.endpoint),
            "  Suggestions:".to_string(),
        ];

        for suggestion in self.format_suggestions() {
            lines.push(format!("    - {suggestion}"));
        }

        lines.join("\n")
    }

    /// Suggestions tailored to the last error.
    pub fn format_suggestions(&self) -> Vec<String> {
        vec![
            self.error_type.suggestion().to_string(),
            format!(
                "Try increasing --max-retries (current: {})",
                self.max_attempts.saturating_sub(1)
            ),
        ]
    }
}
