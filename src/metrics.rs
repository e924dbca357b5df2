//! Observability metrics
//!
//! Counters and histograms for request outcomes, 429 responses, retries and
//! chunk timing. Recording is a no-op until a recorder is installed; pass
//! `--metrics-addr` to expose them on a Prometheus scrape endpoint.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

static METRICS_INITIALIZED: OnceCell<SocketAddr> = OnceCell::new();

/// Metrics setup errors
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Prometheus exporter could not be installed
    #[error("failed to install Prometheus exporter on {addr}: {message}")]
    InstallFailed {
        /// Requested listen address
        addr: SocketAddr,
        /// Underlying error
        message: String,
    },
}

/// Install the Prometheus exporter and register metric descriptions.
///
/// Idempotent: later calls return without reinstalling.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    if METRICS_INITIALIZED.get().is_some() {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::InstallFailed {
            addr,
            message: e.to_string(),
        })?;

    describe_counter!(
        "history_requests_total",
        Unit::Count,
        "History requests that received an HTTP response, by status"
    );
    describe_histogram!(
        "history_request_duration_seconds",
        Unit::Seconds,
        "History request latency"
    );
    describe_counter!(
        "history_429_total",
        Unit::Count,
        "Rate limited (429) history responses"
    );
    describe_counter!("fetch_retries_total", Unit::Count, "Retried item fetches");
    describe_histogram!(
        "fetch_retry_wait_seconds",
        Unit::Seconds,
        "Wait applied before a retry"
    );
    describe_counter!("items_fetched_total", Unit::Count, "Items fetched successfully");
    describe_counter!(
        "items_failed_total",
        Unit::Count,
        "Items whose retry budget was exhausted"
    );
    describe_gauge!(
        "limiter_in_flight",
        Unit::Count,
        "Item fetches holding a concurrency permit"
    );
    describe_histogram!(
        "chunk_duration_seconds",
        Unit::Seconds,
        "Time to resolve every item of a chunk"
    );

    let _ = METRICS_INITIALIZED.set(addr);
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Whether the exporter has been installed
pub fn is_initialized() -> bool {
    METRICS_INITIALIZED.get().is_some()
}

/// Recording helpers for the fetch path
pub struct FetchMetrics;

impl FetchMetrics {
    /// Record a request that received a response
    pub fn record_request(status: u16, latency: Duration) {
        counter!("history_requests_total", "status" => status.to_string()).increment(1);
        histogram!("history_request_duration_seconds").record(latency.as_secs_f64());
    }

    /// Record a 429 response
    pub fn record_rate_limited() {
        counter!("history_429_total").increment(1);
    }

    /// Record a retry and its wait
    pub fn record_retry(wait: Duration) {
        counter!("fetch_retries_total").increment(1);
        histogram!("fetch_retry_wait_seconds").record(wait.as_secs_f64());
    }

    /// Record an item fetched after `attempts` requests
    pub fn record_item_success(attempts: u32) {
        counter!("items_fetched_total", "first_try" => (attempts == 1).to_string()).increment(1);
    }

    /// Record permits held right after one was acquired
    pub fn record_in_flight(in_flight: usize) {
        gauge!("limiter_in_flight").set(in_flight as f64);
    }

    /// Record an item given up on
    pub fn record_item_exhausted() {
        counter!("items_failed_total").increment(1);
    }
}

/// Timing of one harvest chunk
pub struct ChunkMetrics {
    index: usize,
    start_time: Instant,
}

impl ChunkMetrics {
    /// Start timing chunk `index` (1-based)
    pub fn start(index: usize) -> Self {
        Self {
            index,
            start_time: Instant::now(),
        }
    }

    /// Record completion and return the elapsed time
    pub fn finish(self) -> Duration {
        let elapsed = self.start_time.elapsed();
        histogram!("chunk_duration_seconds").record(elapsed.as_secs_f64());
        debug!(
            chunk = self.index,
            elapsed_ms = elapsed.as_millis() as u64,
            "Chunk resolved"
        );
        elapsed
    }
}
