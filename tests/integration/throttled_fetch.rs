//! Integration tests for the retrying per-item fetcher

use crate::support::{fast_config, history, ScriptedSource, Step};
use albion_profit_analyzer::fetcher::ThrottledFetcher;
use albion_profit_analyzer::harvester::{ThrottleBackoff, WaitWindow};
use albion_profit_analyzer::ItemId;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn ok_body(item: &str) -> Step {
    Step::Body(history(item, &[(1000, 4, Utc::now() - ChronoDuration::hours(1))]))
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let source = Arc::new(ScriptedSource::new(ok_body("T4_BAG")));
    let fetcher = ThrottledFetcher::new(source.clone(), &fast_config());

    let points = fetcher.fetch(&ItemId::new("T4_BAG")).await.unwrap();

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].item_count, 4);
    assert_eq!(source.calls("T4_BAG"), 1);
}

#[tokio::test]
async fn test_rate_limited_then_success() {
    let source = Arc::new(
        ScriptedSource::new(ok_body("T4_BAG"))
            .script("T4_BAG", vec![Step::RateLimited, Step::RateLimited]),
    );
    let fetcher = ThrottledFetcher::new(source.clone(), &fast_config());

    let result = fetcher.fetch(&ItemId::new("T4_BAG")).await;

    assert!(result.is_ok());
    assert_eq!(source.calls("T4_BAG"), 3);
}

#[tokio::test]
async fn test_exhaustion_after_retry_budget() {
    let source = Arc::new(ScriptedSource::new(Step::Status(503)));
    let config = fast_config();
    let fetcher = ThrottledFetcher::new(source.clone(), &config);

    let failure = fetcher.fetch(&ItemId::new("T4_BAG")).await.unwrap_err();

    // 1 initial attempt + 5 retries
    assert_eq!(source.calls("T4_BAG"), config.max_attempts());
    assert_eq!(failure.attempts, 6);
    assert_eq!(failure.item.as_str(), "T4_BAG");
    assert!(failure.last_error.contains("503"));
}

#[tokio::test]
async fn test_zero_retries_means_single_attempt() {
    let source = Arc::new(ScriptedSource::new(Step::Timeout));
    let fetcher = ThrottledFetcher::new(source.clone(), &fast_config().with_max_retries(0));

    assert!(fetcher.fetch(&ItemId::new("T4_BAG")).await.is_err());
    assert_eq!(source.calls("T4_BAG"), 1);
}

#[tokio::test]
async fn test_unparseable_success_body_is_retried() {
    let source = Arc::new(
        ScriptedSource::new(ok_body("T4_BAG"))
            .script("T4_BAG", vec![Step::Body(json!({"unexpected": true}))]),
    );
    let fetcher = ThrottledFetcher::new(source.clone(), &fast_config());

    assert!(fetcher.fetch(&ItemId::new("T4_BAG")).await.is_ok());
    assert_eq!(source.calls("T4_BAG"), 2);
}

#[tokio::test]
async fn test_empty_history_is_success_without_points() {
    let source = Arc::new(ScriptedSource::new(Step::Body(json!([]))));
    let fetcher = ThrottledFetcher::new(source.clone(), &fast_config());

    let points = fetcher.fetch(&ItemId::new("T4_BAG")).await.unwrap();
    assert!(points.is_empty());
    assert_eq!(source.calls("T4_BAG"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_backoff_is_linear_and_capped() {
    let source = Arc::new(
        ScriptedSource::new(ok_body("T4_BAG")).script(
            "T4_BAG",
            vec![Step::RateLimited, Step::RateLimited, Step::RateLimited],
        ),
    );
    let config = fast_config().with_throttle(ThrottleBackoff {
        base: Duration::from_secs(30),
        cap: Duration::from_secs(60),
        jitter_max: Duration::ZERO,
    });
    let fetcher = ThrottledFetcher::new(source, &config);

    let started = tokio::time::Instant::now();
    fetcher.fetch(&ItemId::new("T4_BAG")).await.unwrap();

    // 30s, then min(60s, 60s), then min(90s, 60s)
    assert_eq!(started.elapsed(), Duration::from_secs(150));
}

#[tokio::test(start_paused = true)]
async fn test_other_errors_use_normal_pause() {
    let source = Arc::new(
        ScriptedSource::new(ok_body("T4_BAG")).script("T4_BAG", vec![Step::Status(500)]),
    );
    let config = fast_config().with_request_pause(WaitWindow::from_millis(500, 500));
    let fetcher = ThrottledFetcher::new(source, &config);

    let started = tokio::time::Instant::now();
    fetcher.fetch(&ItemId::new("T4_BAG")).await.unwrap();

    // one pause after the failure, one after the success
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

#[tokio::test]
async fn test_permit_held_across_retries() {
    let source = Arc::new(
        ScriptedSource::new(ok_body("T4_BAG"))
            .with_latency(Duration::from_millis(10))
            .script("T4_BAG", vec![Step::Status(502), Step::Status(502)]),
    );
    let fetcher = ThrottledFetcher::new(source.clone(), &fast_config().with_concurrency(1));

    let first = ItemId::new("T4_BAG");
    let second = ItemId::new("T5_BAG");
    let (a, b) = tokio::join!(fetcher.fetch(&first), fetcher.fetch(&second));
    assert!(a.is_ok() && b.is_ok());

    // every attempt of the first item finishes before the second starts
    assert_eq!(source.requests(), ["T4_BAG", "T4_BAG", "T4_BAG", "T5_BAG"]);
    assert_eq!(source.calls("T4_BAG"), 3);
    assert_eq!(source.max_in_flight(), 1);
}
