//! Unit tests for retry message formatting

use albion_profit_analyzer::fetcher::retry_formatter::{RetryContext, RetryErrorType};
use albion_profit_analyzer::fetcher::FetcherError;
use std::time::Duration;

#[test]
fn test_retry_message_for_rate_limit() {
    let ctx = RetryContext::new(
        2,
        6,
        &FetcherError::RateLimitExceeded,
        Duration::from_millis(61_500),
        "T5_BAG",
        "https://east.albion-online-data.com/api/v2/stats/history/T5_BAG",
    );

    assert_eq!(ctx.error_type, RetryErrorType::RateLimit);
    assert_eq!(
        ctx.format_retry(),
        "Retrying T5_BAG (attempt 2/6) after rate limit exceeded (429) - waiting 61.5 seconds..."
    );
}

#[test]
fn test_failure_summary_includes_endpoint_and_suggestions() {
    let ctx = RetryContext::new(
        6,
        6,
        &FetcherError::HttpError {
            status: 502,
            message: "upstream".to_string(),
        },
        Duration::from_millis(600),
        "T5_BAG",
        "https://example.test/history/T5_BAG",
    );

    let summary = ctx.format_failure();
    assert!(summary.starts_with("[FAILED] T5_BAG gave up after 6 attempts"));
    assert!(summary.contains("Endpoint: https://example.test/history/T5_BAG"));
    assert!(summary.contains("HTTP error 502"));
    assert!(summary.contains("--max-retries (current: 5)"));
}

#[test]
fn test_success_message() {
    let ctx = RetryContext::new(
        3,
        6,
        &FetcherError::Timeout("10s".to_string()),
        Duration::ZERO,
        "T4_CAPE",
        "scripted",
    );
    assert_eq!(ctx.format_success(), "Fetched T4_CAPE on attempt 3/6");
}

#[test]
fn test_descriptions() {
    assert_eq!(RetryErrorType::ServerError(503).description(), "service unavailable");
    assert_eq!(RetryErrorType::ClientError(404).description(), "item not found");
    assert_eq!(
        RetryErrorType::from(&FetcherError::ParseError("x".into())),
        RetryErrorType::MalformedResponse
    );
    assert_eq!(
        RetryErrorType::from(&FetcherError::NetworkError("refused".into())),
        RetryErrorType::NetworkOffline
    );
}
