//! Integration tests for chunked harvesting

use crate::support::{fast_config, history, ids, ScriptedSource, Step};
use albion_profit_analyzer::harvester::{ChunkedHarvester, WaitWindow};
use albion_profit_analyzer::ItemId;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

fn ok_source() -> ScriptedSource {
    ScriptedSource::new(Step::Body(history(
        "ANY",
        &[(250, 2, Utc::now() - ChronoDuration::hours(2))],
    )))
}

fn item_ids(n: usize) -> Vec<ItemId> {
    (0..n).map(|i| ItemId::new(format!("T4_ITEM_{i:02}"))).collect()
}

#[tokio::test]
async fn test_chunks_are_contiguous_and_in_order() {
    let source = Arc::new(ok_source());
    let harvester = ChunkedHarvester::new(source, fast_config().with_chunk_size(4));
    let items = item_ids(10);

    let mut seen: Vec<(Vec<ItemId>, usize)> = Vec::new();
    let report = harvester
        .harvest(&items, |chunk, points| seen.push((chunk.to_vec(), points.len())))
        .await;

    assert_eq!(report.chunks, 3);
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].0, items[0..4]);
    assert_eq!(seen[1].0, items[4..8]);
    assert_eq!(seen[2].0, items[8..10]);
    assert_eq!(seen[2].1, 2);
    assert_eq!(report.points, 10);
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_points_are_attributed_to_their_item() {
    let source = Arc::new(ok_source());
    let harvester = ChunkedHarvester::new(source, fast_config().with_chunk_size(3));
    let items = ids(&["T4_BAG", "T5_BAG", "T6_BAG"]);

    let (points, _) = harvester.harvest_all(&items).await;

    let owners: Vec<&str> = points.iter().map(|p| p.item_id.as_str()).collect();
    assert_eq!(owners, ["T4_BAG", "T5_BAG", "T6_BAG"]);
}

#[tokio::test]
async fn test_failed_items_listed_once_and_excluded() {
    let source = Arc::new(ok_source().script("T5_BAG", vec![Step::Status(503); 10]));
    let harvester = ChunkedHarvester::new(source.clone(), fast_config().with_chunk_size(2));
    let items = ids(&["T4_BAG", "T5_BAG", "T6_BAG"]);

    let mut chunk_points = Vec::new();
    let report = harvester
        .harvest(&items, |_, points| chunk_points.extend(points))
        .await;

    assert_eq!(report.failed_items, ids(&["T5_BAG"]));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].attempts, 6);
    assert_eq!(report.succeeded, 2);
    assert_eq!(source.calls("T5_BAG"), 6);
    assert!(chunk_points.iter().all(|p| p.item_id.as_str() != "T5_BAG"));
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_duplicate_ids_fetched_once() {
    let source = Arc::new(ok_source());
    let harvester = ChunkedHarvester::new(source.clone(), fast_config());
    let items = ids(&["T4_BAG", "T5_BAG", "T4_BAG"]);

    let (points, report) = harvester.harvest_all(&items).await;

    assert_eq!(report.total_items, 2);
    assert_eq!(source.calls("T4_BAG"), 1);
    assert_eq!(points.len(), 2);
}

#[tokio::test]
async fn test_concurrency_limit_never_exceeded() {
    let source = Arc::new(ok_source().with_latency(Duration::from_millis(20)));
    let config = fast_config().with_chunk_size(21).with_concurrency(7);
    let harvester = ChunkedHarvester::new(source.clone(), config);

    let report = harvester.harvest(&item_ids(21), |_, _| {}).await;

    assert_eq!(report.succeeded, 21);
    assert!(source.max_in_flight() <= 7);
    assert!(source.max_in_flight() > 1);
}

#[tokio::test]
async fn test_chunks_do_not_overlap() {
    let source = Arc::new(ok_source().with_latency(Duration::from_millis(20)));
    let config = fast_config().with_chunk_size(3).with_concurrency(7);
    let harvester = ChunkedHarvester::new(source.clone(), config);

    harvester.harvest(&item_ids(9), |_, _| {}).await;

    assert!(source.max_in_flight() <= 3);
    assert_eq!(source.total_calls(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_no_pause_after_last_chunk() {
    let source = Arc::new(ok_source());
    let config = fast_config()
        .with_chunk_size(2)
        .with_chunk_pause(WaitWindow::from_millis(2000, 2000));
    let harvester = ChunkedHarvester::new(source, config);

    let started = tokio::time::Instant::now();
    let report = harvester.harvest(&item_ids(6), |_, _| {}).await;

    assert_eq!(report.chunks, 3);
    // pauses after chunk 1 and chunk 2 only
    assert_eq!(started.elapsed(), Duration::from_secs(4));
}

#[tokio::test]
async fn test_empty_item_list() {
    let source = Arc::new(ok_source());
    let harvester = ChunkedHarvester::new(source.clone(), fast_config());

    let mut callbacks = 0;
    let report = harvester.harvest(&[], |_, _| callbacks += 1).await;

    assert_eq!(callbacks, 0);
    assert_eq!(report.chunks, 0);
    assert_eq!(source.total_calls(), 0);
}
