//! Trade-weighted price aggregation
//!
//! Raw points are filtered to the freshness window, grouped by item and
//! reduced to `Σ(price × count) / Σ(count)`. Weighting by trade count keeps
//! thinly traded quality levels from skewing the average.
//!
//! Grouping is by item id and chunks partition item ids, so aggregating per
//! chunk and aggregating the whole run give the same records.

use crate::catalog::CostModel;
use crate::identifier::ItemId;
use crate::{ItemProfitRecord, RawPricePoint};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Default freshness window in days
pub const FRESHNESS_DAYS: i64 = 7;

/// Oldest timestamp still considered fresh for a run started at `run_start`.
pub fn freshness_cutoff(run_start: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    run_start - Duration::days(days)
}

#[derive(Debug)]
struct Accumulator {
    weighted_sum: Decimal,
    trade_count: u64,
    latest: DateTime<Utc>,
}

/// Aggregate `points` into one profit record per item of `items`.
///
/// Points older than `cutoff` are ignored (a point exactly at the cutoff is
/// kept). Items with no fresh point, or whose fresh points sum to zero
/// trades, produce no record. An item whose price or trade totals overflow
/// is logged and dropped. Records follow the order of `items`; points
/// for items not listed are ignored.
pub fn aggregate_points(
    items: &[ItemId],
    points: &[RawPricePoint],
    cutoff: DateTime<Utc>,
    cost_model: &CostModel<'_>,
) -> Vec<ItemProfitRecord> {
    let mut groups: HashMap<&ItemId, Accumulator> = HashMap::new();
    let mut overflowed: HashSet<&ItemId> = HashSet::new();

    for point in points.iter().filter(|p| p.timestamp >= cutoff) {
        if overflowed.contains(&point.item_id) {
            continue;
        }
        let acc = groups.entry(&point.item_id).or_insert(Accumulator {
            weighted_sum: Decimal::ZERO,
            trade_count: 0,
            latest: point.timestamp,
        });

        let weighted_sum = point
            .avg_price
            .checked_mul(Decimal::from(point.item_count))
            .and_then(|value| acc.weighted_sum.checked_add(value));
        let trade_count = acc.trade_count.checked_add(point.item_count);
        match (weighted_sum, trade_count) {
            (Some(sum), Some(count)) => {
                acc.weighted_sum = sum;
                acc.trade_count = count;
                acc.latest = acc.latest.max(point.timestamp);
            }
            _ => {
                warn!(
                    item = %point.item_id,
                    quality = %point.quality,
                    avg_price = %point.avg_price,
                    item_count = point.item_count,
                    "Price totals overflow, dropping item"
                );
                groups.remove(&point.item_id);
                overflowed.insert(&point.item_id);
            }
        }
    }

    let mut emitted = HashSet::new();
    let mut records = Vec::new();
    for item in items {
        if !emitted.insert(item) {
            continue;
        }
        let Some(acc) = groups.get(item) else {
            continue;
        };
        if acc.trade_count == 0 {
            debug!(item = %item, "No trades in freshness window");
            continue;
        }

        let Some(weighted_avg) = acc.weighted_sum.checked_div(Decimal::from(acc.trade_count))
        else {
            continue;
        };
        records.push(ItemProfitRecord::new(
            item.clone(),
            cost_model.cost_or_none(item),
            weighted_avg,
            acc.trade_count,
            acc.latest,
        ));
    }

    records
}

/// Point counters collected while aggregating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Raw points received
    pub points_received: usize,
    /// Points inside the freshness window
    pub points_fresh: usize,
    /// Records produced
    pub records: usize,
}

/// Streaming aggregator with a cutoff fixed at construction.
///
/// Feed it one chunk at a time with [`Aggregator::ingest`]; the chunk's raw
/// points are dropped once reduced.
#[derive(Debug)]
pub struct Aggregator {
    cutoff: DateTime<Utc>,
    records: Vec<ItemProfitRecord>,
    stats: AggregationStats,
}

impl Aggregator {
    /// Create an aggregator keeping points at or after `cutoff`.
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff,
            records: Vec::new(),
            stats: AggregationStats::default(),
        }
    }

    /// Cutoff in use
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Reduce one chunk's points and append its records.
    pub fn ingest(
        &mut self,
        chunk_items: &[ItemId],
        points: Vec<RawPricePoint>,
        cost_model: &CostModel<'_>,
    ) {
        let fresh = points.iter().filter(|p| p.timestamp >= self.cutoff).count();
        let records = aggregate_points(chunk_items, &points, self.cutoff, cost_model);

        debug!(
            items = chunk_items.len(),
            points = points.len(),
            fresh = fresh,
            records = records.len(),
            "Aggregated chunk"
        );

        self.stats.points_received += points.len();
        self.stats.points_fresh += fresh;
        self.stats.records += records.len();
        self.records.extend(records);
    }

    /// Counters so far
    pub fn stats(&self) -> AggregationStats {
        self.stats
    }

    /// Records so far
    pub fn records(&self) -> &[ItemProfitRecord] {
        &self.records
    }

    /// Consume the aggregator and return its records.
    pub fn into_records(self) -> Vec<ItemProfitRecord> {
        info!(
            points = self.stats.points_received,
            fresh = self.stats.points_fresh,
            excluded = self.stats.points_received - self.stats.points_fresh,
            records = self.stats.records,
            "Aggregation finished"
        );
        self.records
    }
}
