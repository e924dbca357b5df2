//! Throttled, retrying per-item fetcher
//!
//! Per item: `Pending -> Requesting -> {Success, RateLimited, OtherError}`,
//! with `RateLimited` and `OtherError` looping back to `Requesting` until the
//! retry budget is spent. A concurrency permit is held across the whole loop.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::fetcher::history_parser::HistoryParser;
use crate::fetcher::retry_formatter::RetryContext;
use crate::fetcher::{FetcherError, HistorySource};
use crate::harvester::config::{ThrottleBackoff, WaitWindow};
use crate::harvester::rate_limit::ConcurrencyLimiter;
use crate::harvester::HarvestConfig;
use crate::identifier::ItemId;
use crate::metrics::FetchMetrics;
use crate::RawPricePoint;

/// Terminal failure of one item after its retry budget ran out.
#[derive(Debug, Clone, thiserror::Error)]
#[error("fetch exhausted for {item} after {attempts} attempts: {last_error}")]
pub struct FetchExhausted {
    /// Item that could not be fetched
    pub item: ItemId,
    /// Requests issued
    pub attempts: u32,
    /// Description of the last failure
    pub last_error: String,
}

/// Result of one item fetch
pub type FetchOutcome = Result<Vec<RawPricePoint>, FetchExhausted>;

/// Fetches one item's history under the shared concurrency limiter.
#[derive(Clone)]
pub struct ThrottledFetcher {
    source: Arc<dyn HistorySource>,
    limiter: ConcurrencyLimiter,
    max_retries: u32,
    request_pause: WaitWindow,
    throttle: ThrottleBackoff,
}

impl ThrottledFetcher {
    /// Create a fetcher with its own limiter sized from the config.
    pub fn new(source: Arc<dyn HistorySource>, config: &HarvestConfig) -> Self {
        Self::with_limiter(source, config, ConcurrencyLimiter::new(config.concurrency))
    }

    /// Create a fetcher sharing an existing limiter.
    pub fn with_limiter(
        source: Arc<dyn HistorySource>,
        config: &HarvestConfig,
        limiter: ConcurrencyLimiter,
    ) -> Self {
        Self {
            source,
            limiter,
            max_retries: config.max_retries,
            request_pause: config.request_pause,
            throttle: config.throttle,
        }
    }

    /// Shared limiter
    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Fetch the latest point of every quality series of `item`.
    ///
    /// # Errors
    /// Returns [`FetchExhausted`] once `max_retries + 1` attempts have failed.
    /// The error is per item and never aborts a harvest.
    pub async fn fetch(&self, item: &ItemId) -> FetchOutcome {
        let max_attempts = self.max_retries.saturating_add(1);

        let _permit = self.limiter.acquire().await.map_err(|e| FetchExhausted {
            item: item.clone(),
            attempts: 0,
            last_error: e.to_string(),
        })?;
        FetchMetrics::record_in_flight(self.limiter.in_flight());

        let mut attempt: u32 = 0;
        let mut last_failure: Option<RetryContext> = None;

        while attempt <= self.max_retries {
            match self.request_once(item).await {
                Ok(points) => {
                    FetchMetrics::record_item_success(attempt + 1);
                    if let Some(mut ctx) = last_failure.take() {
                        ctx.attempt = attempt + 1;
                        info!("{}", ctx.format_success());
                    }
                    debug!(item = %item, points = points.len(), "Fetched price history");

                    pause(self.request_pause.sample()).await;
                    return Ok(points);
                }
                Err(err) => {
                    attempt += 1;

                    let wait = if err.is_rate_limit() {
                        FetchMetrics::record_rate_limited();
                        self.throttle.delay(attempt)
                    } else {
                        self.request_pause.sample()
                    };

                    let ctx = RetryContext::new(
                        attempt,
                        max_attempts,
                        &err,
                        wait,
                        item.as_str(),
                        self.source.endpoint(item),
                    );

                    if attempt <= self.max_retries {
                        FetchMetrics::record_retry(wait);
                        warn!("{}", ctx.format_retry());
                    } else {
                        debug!(item = %item, error = %err, "Final attempt failed");
                    }

                    pause(wait).await;
                    last_failure = Some(ctx);
                }
            }
        }

        FetchMetrics::record_item_exhausted();
        let last_error = match last_failure {
            Some(ctx) => {
                error!("{}", ctx.format_failure());
                ctx.error_message
            }
            None => "no attempts made".to_string(),
        };

        Err(FetchExhausted {
            item: item.clone(),
            attempts: attempt,
            last_error,
        })
    }

    async fn request_once(&self, item: &ItemId) -> Result<Vec<RawPricePoint>, FetcherError> {
        let body = self.source.fetch_history(item).await?;
        HistoryParser::latest_points(item, self.source.location(), &body)
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
