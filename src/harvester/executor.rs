//! Chunked harvest driver
//!
//! Items are split into contiguous chunks. Chunks run strictly one after
//! another; inside a chunk every item is launched at once and the shared
//! limiter decides how many are actually in flight.

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::fetcher::{FetchExhausted, HistorySource, ThrottledFetcher};
use crate::harvester::config::WaitWindow;
use crate::harvester::HarvestConfig;
use crate::identifier::ItemId;
use crate::metrics::ChunkMetrics;
use crate::RawPricePoint;

/// Summary of a finished harvest. Failures are diagnostic only.
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    /// Distinct items requested
    pub total_items: usize,
    /// Chunks processed
    pub chunks: usize,
    /// Items fetched successfully
    pub succeeded: usize,
    /// Raw points handed to the chunk callback
    pub points: usize,
    /// Items whose retry budget ran out, in harvest order, each listed once
    pub failed_items: Vec<ItemId>,
    /// Failure detail per failed item
    pub failures: Vec<FetchExhausted>,
    /// Wall time of the whole harvest
    pub elapsed: Duration,
}

impl HarvestReport {
    /// Whether every item was fetched
    pub fn is_complete(&self) -> bool {
        self.failed_items.is_empty()
    }
}

/// Drives a [`ThrottledFetcher`] over the item set chunk by chunk.
pub struct ChunkedHarvester {
    fetcher: ThrottledFetcher,
    chunk_size: usize,
    chunk_pause: WaitWindow,
}

impl ChunkedHarvester {
    /// Create a harvester over a history source.
    pub fn new(source: Arc<dyn HistorySource>, config: HarvestConfig) -> Self {
        let fetcher = ThrottledFetcher::new(source, &config);
        Self::with_fetcher(fetcher, &config)
    }

    /// Create a harvester around an existing fetcher (and its limiter).
    pub fn with_fetcher(fetcher: ThrottledFetcher, config: &HarvestConfig) -> Self {
        Self {
            fetcher,
            chunk_size: config.chunk_size.max(1),
            chunk_pause: config.chunk_pause,
        }
    }

    /// Fetcher in use
    pub fn fetcher(&self) -> &ThrottledFetcher {
        &self.fetcher
    }

    /// Number of chunks `item_count` items split into
    pub fn chunk_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.chunk_size)
    }

    /// Fetch every item, handing each chunk's points to `on_chunk` as soon as
    /// the chunk resolves.
    ///
    /// `on_chunk` receives the chunk's items and the points of its successful
    /// items, in chunk order. Duplicate ids in `items` are fetched once.
    pub async fn harvest<F>(&self, items: &[ItemId], mut on_chunk: F) -> HarvestReport
    where
        F: FnMut(&[ItemId], Vec<RawPricePoint>),
    {
        let started = Instant::now();
        let items = dedup_preserving_order(items);
        let total_chunks = self.chunk_count(items.len());

        let mut report = HarvestReport {
            total_items: items.len(),
            ..HarvestReport::default()
        };

        info!(
            items = items.len(),
            chunks = total_chunks,
            chunk_size = self.chunk_size,
            concurrency = self.fetcher.limiter().max_permits(),
            "Starting harvest"
        );

        for (index, chunk) in items.chunks(self.chunk_size).enumerate() {
            let chunk_no = index + 1;
            info!(
                chunk = chunk_no,
                chunks = total_chunks,
                items = chunk.len(),
                "Processing chunk"
            );

            let timer = ChunkMetrics::start(chunk_no);
            let outcomes = join_all(chunk.iter().map(|item| self.fetcher.fetch(item))).await;
            timer.finish();

            let mut chunk_points = Vec::new();
            for (item, outcome) in chunk.iter().zip(outcomes) {
                match outcome {
                    Ok(points) => {
                        debug!(item = %item, points = points.len(), "Item resolved");
                        report.succeeded += 1;
                        chunk_points.extend(points);
                    }
                    Err(failure) => {
                        warn!(item = %item, attempts = failure.attempts, "Item failed, excluding from results");
                        report.failed_items.push(item.clone());
                        report.failures.push(failure);
                    }
                }
            }

            report.points += chunk_points.len();
            report.chunks += 1;
            on_chunk(chunk, chunk_points);

            if chunk_no < total_chunks {
                let wait = self.chunk_pause.sample();
                if !wait.is_zero() {
                    debug!(wait_ms = wait.as_millis() as u64, "Pausing between chunks");
                    tokio::time::sleep(wait).await;
                }
            }
        }

        report.elapsed = started.elapsed();

        if report.failed_items.is_empty() {
            info!(
                items = report.total_items,
                points = report.points,
                elapsed_secs = report.elapsed.as_secs(),
                "Harvest complete"
            );
        } else {
            let failed: Vec<&str> = report.failed_items.iter().map(ItemId::as_str).collect();
            warn!(
                failed = report.failed_items.len(),
                items = report.total_items,
                "Harvest complete with failures; rerun to retry: {}",
                failed.join(", ")
            );
        }

        report
    }

    /// Fetch every item and buffer all points in memory.
    pub async fn harvest_all(&self, items: &[ItemId]) -> (Vec<RawPricePoint>, HarvestReport) {
        let mut all_points = Vec::new();
        let report = self
            .harvest(items, |_, points| all_points.extend(points))
            .await;
        (all_points, report)
    }
}

fn dedup_preserving_order(items: &[ItemId]) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(items.len());
    let unique: Vec<ItemId> = items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect();

    if unique.len() != items.len() {
        warn!(
            duplicates = items.len() - unique.len(),
            "Duplicate item ids ignored"
        );
    }
    unique
}
