//! Integration tests for logging and tracing

use crate::support::{fast_config, ScriptedSource, Step};
use albion_profit_analyzer::harvester::ChunkedHarvester;
use albion_profit_analyzer::ItemId;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[test]
fn test_tracing_subscriber_initialization() {
    // Either succeeds or fails because already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("albion_profit_analyzer=debug")),
        )
        .with_test_writer()
        .try_init();

    info!(items = 3, "Subscriber ready");
}

#[test]
fn test_tracing_json_format() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("albion_profit_analyzer=info"))
        .with_test_writer()
        .try_init();

    warn!(item = "T5_BAG", attempt = 2, "Structured field logging");
}

#[test]
fn test_env_filter_parsing() {
    for directive in [
        "info",
        "albion_profit_analyzer=debug",
        "warn,albion_profit_analyzer::fetcher=trace",
    ] {
        assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
    }
}

#[tokio::test]
async fn test_harvest_with_failures_logs_without_panicking() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("albion_profit_analyzer=trace"))
        .with_test_writer()
        .try_init();

    let source = Arc::new(ScriptedSource::new(Step::RateLimited));
    let harvester = ChunkedHarvester::new(source, fast_config().with_max_retries(2));

    let report = harvester
        .harvest(&[ItemId::new("T4_BAG")], |_, _| {})
        .await;

    assert_eq!(report.failed_items.len(), 1);
    assert!(report.failures[0].last_error.contains("rate limit"));
}
