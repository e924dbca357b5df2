//! End-to-end pipeline tests: enumerate, harvest, aggregate, report

use crate::support::{fast_config, history, rfc3339, series, ScriptedSource, Step};
use albion_profit_analyzer::aggregate::{aggregate_points, freshness_cutoff, Aggregator};
use albion_profit_analyzer::catalog::{items, Catalog, CostModel};
use albion_profit_analyzer::harvester::ChunkedHarvester;
use albion_profit_analyzer::output::csv::write_report;
use albion_profit_analyzer::output::sort_records;
use albion_profit_analyzer::{ItemId, ItemProfitRecord};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;

fn run_start() -> DateTime<Utc> {
    Utc::now()
}

#[tokio::test]
async fn test_main_sword_scenario() {
    let catalog = Catalog::builtin();
    let model = CostModel::new(&catalog);

    let targets = items::enumerate_items(&["MAIN_SWORD"], &["T5"], &["", "@1"]);
    let target_strs: Vec<&str> = targets.iter().map(ItemId::as_str).collect();
    assert_eq!(target_strs, ["T5_MAIN_SWORD", "T5_MAIN_SWORD@1"]);

    // (1063*16 + 1330*8) * (1 - 0.152)
    let expected_cost = Decimal::from_str("23445.504").unwrap();
    assert_eq!(model.cost(&targets[0]).unwrap(), expected_cost);

    let now = run_start();
    let fresh = now - Duration::days(1);
    let source = Arc::new(
        ScriptedSource::new(Step::Body(serde_json::json!([])))
            .script(
                "T5_MAIN_SWORD",
                vec![Step::Body(series(
                    "T5_MAIN_SWORD",
                    &[
                        (1, &[(30000, 10, fresh), (99999, 1, now - Duration::days(20))]),
                        (2, &[(34000, 30, fresh)]),
                    ],
                ))],
            )
            .script(
                "T5_MAIN_SWORD@1",
                vec![Step::RateLimited, Step::Body(history("T5_MAIN_SWORD@1", &[(60000, 5, fresh)]))],
            ),
    );

    let harvester = ChunkedHarvester::new(source, fast_config());
    let mut aggregator = Aggregator::new(freshness_cutoff(now, 7));
    let report = harvester
        .harvest(&targets, |chunk, points| aggregator.ingest(chunk, points, &model))
        .await;
    assert!(report.is_complete());

    let mut records = aggregator.into_records();
    sort_records(&mut records);
    assert_eq!(records.len(), 2);

    let base = records
        .iter()
        .find(|r| r.item_id.as_str() == "T5_MAIN_SWORD")
        .unwrap();
    // latest point per quality: 30000 x 10 and 34000 x 30
    assert_eq!(base.weighted_avg_price, Decimal::from(33000));
    assert_eq!(base.total_trade_count, 40);
    assert_eq!(base.cost, Some(expected_cost));
    assert_eq!(base.profit, Some(Decimal::from(33000) - expected_cost));
}

#[tokio::test]
async fn test_streaming_matches_whole_set() {
    let catalog = Catalog::builtin();
    let model = CostModel::new(&catalog);
    let targets = items::enumerate_items(&["BAG", "CAPE", "MAIN_SWORD"], &["T4", "T5"], &["", "@1"]);

    let now = run_start();
    let mut source = ScriptedSource::new(Step::Body(serde_json::json!([])));
    for (i, item) in targets.iter().enumerate() {
        let price = 1000 + 37 * i as i64;
        let count = (i % 4) as u64;
        let age = Duration::days((i % 10) as i64);
        source = source.script(
            item.as_str(),
            vec![Step::Body(series(
                item.as_str(),
                &[(1, &[(price, count, now - age)]), (3, &[(price * 2, 1, now - age)])],
            ))],
        );
    }
    let source = Arc::new(source);
    let cutoff = freshness_cutoff(now, 7);

    let harvester = ChunkedHarvester::new(source, fast_config().with_chunk_size(5));
    let mut all_points = Vec::new();
    let mut aggregator = Aggregator::new(cutoff);
    harvester
        .harvest(&targets, |chunk, points| {
            all_points.extend(points.iter().cloned());
            aggregator.ingest(chunk, points, &model);
        })
        .await;

    let streamed: Vec<ItemProfitRecord> = aggregator.into_records();
    let whole = aggregate_points(&targets, &all_points, cutoff, &model);

    assert!(!whole.is_empty());
    assert_eq!(streamed.len(), whole.len());
    let key = |r: &ItemProfitRecord| format!("{:?}", r);
    let streamed: HashSet<String> = streamed.iter().map(key).collect();
    let whole: HashSet<String> = whole.iter().map(key).collect();
    assert_eq!(streamed, whole);
}

#[tokio::test]
async fn test_failed_item_absent_from_report() {
    let catalog = Catalog::builtin();
    let model = CostModel::new(&catalog);
    let targets = items::enumerate_items(&["BAG"], &["T4", "T5", "T6"], &[""]);
    let now = run_start();

    let source = Arc::new(
        ScriptedSource::new(Step::Body(history("ANY", &[(5000, 3, now - Duration::hours(3))])))
            .script("T5_BAG", vec![Step::Timeout; 6]),
    );
    let harvester = ChunkedHarvester::new(source, fast_config().with_chunk_size(2));
    let mut aggregator = Aggregator::new(freshness_cutoff(now, 7));
    let report = harvester
        .harvest(&targets, |chunk, points| aggregator.ingest(chunk, points, &model))
        .await;

    let records = aggregator.into_records();
    assert_eq!(report.failed_items.iter().filter(|i| i.as_str() == "T5_BAG").count(), 1);
    assert!(records.iter().all(|r| r.item_id.as_str() != "T5_BAG"));
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_stale_data_yields_no_records() {
    let catalog = Catalog::builtin();
    let model = CostModel::new(&catalog);
    let targets = items::enumerate_items(&["BAG"], &["T4"], &["", "@1"]);
    let now = run_start();

    let source = Arc::new(ScriptedSource::new(Step::Body(history(
        "ANY",
        &[(5000, 3, now - Duration::days(30))],
    ))));
    let harvester = ChunkedHarvester::new(source, fast_config());
    let mut aggregator = Aggregator::new(freshness_cutoff(now, 7));
    harvester
        .harvest(&targets, |chunk, points| aggregator.ingest(chunk, points, &model))
        .await;

    assert_eq!(aggregator.stats().points_received, 2);
    assert_eq!(aggregator.stats().points_fresh, 0);
    assert!(aggregator.into_records().is_empty());
}

#[test]
fn test_csv_report_sorted_with_empty_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("report.csv");
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let mut records = vec![
        ItemProfitRecord::new(ItemId::new("T4_UNKNOWN"), None, Decimal::from(10), 1, ts),
        ItemProfitRecord::new(
            ItemId::new("T4_BAG"),
            Some(Decimal::from(100)),
            Decimal::from(120),
            3,
            ts,
        ),
        ItemProfitRecord::new(
            ItemId::new("T5_BAG@1"),
            Some(Decimal::from(100)),
            Decimal::from(200),
            2,
            ts,
        ),
    ];
    sort_records(&mut records);
    let written = write_report(&path, &records).unwrap();
    assert_eq!(written, 3);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        [
            "item_id",
            "tier",
            "enchant",
            "cost",
            "avg_price",
            "profit",
            "profit_pct",
            "trade_count",
            "latest_update"
        ]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[0][0], "T5_BAG@1");
    assert_eq!(&rows[0][2], "@1");
    assert_eq!(&rows[0][6], "100");
    assert_eq!(&rows[1][0], "T4_BAG");
    assert_eq!(&rows[1][2], "");
    assert_eq!(&rows[2][0], "T4_UNKNOWN");
    assert_eq!(&rows[2][3], "");
    assert_eq!(&rows[2][5], "");
    assert_eq!(&rows[2][6], "");
    assert_eq!(&rows[2][8], rfc3339(ts).as_str());
}
