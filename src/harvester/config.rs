//! Harvest configuration
//!
//! Defaults match the pacing the public Albion Online Data Project API
//! tolerates for anonymous clients.

use crate::BLACK_MARKET;
use rand::Rng;
use std::time::Duration;

/// Default upstream API base URL (Americas server).
pub const DEFAULT_BASE_URL: &str = "https://east.albion-online-data.com";

/// Maximum number of retries per item.
/// An item gets at most `MAX_RETRIES + 1` requests before it is marked failed.
pub const MAX_RETRIES: u32 = 5;

/// Items per chunk.
pub const CHUNK_SIZE: usize = 7;

/// Concurrent in-flight items across the whole run.
pub const CONCURRENT_REQUESTS: usize = 7;

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// History time scale requested from the API (6 = daily buckets).
pub const TIME_SCALE: u32 = 6;

/// Pause after each successful or failed (non-429) request, in milliseconds.
pub const NORMAL_WAIT_MIN_MS: u64 = 400;
/// Upper bound of the per-request pause, in milliseconds.
pub const NORMAL_WAIT_MAX_MS: u64 = 800;

/// Linear 429 backoff step in milliseconds (multiplied by the attempt number).
pub const THROTTLE_WAIT_BASE_MS: u64 = 30_000;
/// Cap of the 429 backoff in milliseconds.
pub const THROTTLE_WAIT_MAX_MS: u64 = 60_000;
/// Maximum random jitter added to the 429 backoff, in milliseconds.
pub const THROTTLE_JITTER_MAX_MS: u64 = 2_000;

/// Inter-chunk pause bounds in milliseconds.
pub const CHUNK_WAIT_MIN_MS: u64 = 2_000;
/// Upper bound of the inter-chunk pause, in milliseconds.
pub const CHUNK_WAIT_MAX_MS: u64 = 5_000;

/// Inclusive window a randomized pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitWindow {
    min: Duration,
    max: Duration,
}

impl WaitWindow {
    /// Window between `min` and `max`; bounds are swapped if reversed.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Window from millisecond bounds
    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// Window that never waits
    pub fn zero() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Lower bound
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw a uniformly distributed duration from the window.
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Linear backoff applied to 429 responses: `min(base * attempt + jitter, cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleBackoff {
    /// Step multiplied by the attempt number
    pub base: Duration,
    /// Upper bound of the total wait
    pub cap: Duration,
    /// Maximum random jitter added before capping
    pub jitter_max: Duration,
}

impl ThrottleBackoff {
    /// Backoff that never waits
    pub fn zero() -> Self {
        Self {
            base: Duration::ZERO,
            cap: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    /// Deterministic part of the delay for a given jitter.
    pub fn delay_with_jitter(&self, attempt: u32, jitter: Duration) -> Duration {
        (self.base.saturating_mul(attempt) + jitter).min(self.cap)
    }

    /// Delay for `attempt` (1-based) with a random jitter drawn from `[0, jitter_max]`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter = WaitWindow::new(Duration::ZERO, self.jitter_max).sample();
        self.delay_with_jitter(attempt, jitter)
    }
}

impl Default for ThrottleBackoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(THROTTLE_WAIT_BASE_MS),
            cap: Duration::from_millis(THROTTLE_WAIT_MAX_MS),
            jitter_max: Duration::from_millis(THROTTLE_JITTER_MAX_MS),
        }
    }
}

/// Immutable configuration handed to the fetcher and the harvester.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// API base URL without trailing slash
    pub base_url: String,
    /// Market location queried
    pub location: String,
    /// History time scale parameter
    pub time_scale: u32,
    /// Retry budget per item
    pub max_retries: u32,
    /// Items per chunk
    pub chunk_size: usize,
    /// Global concurrency limit
    pub concurrency: usize,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Pause after each request (success or non-429 failure)
    pub request_pause: WaitWindow,
    /// 429 backoff policy
    pub throttle: ThrottleBackoff,
    /// Pause between chunks
    pub chunk_pause: WaitWindow,
}

impl HarvestConfig {
    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set market location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set history time scale
    pub fn with_time_scale(mut self, time_scale: u32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Set retry budget
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set chunk size (at least 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set concurrency limit (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set per-request pause window
    pub fn with_request_pause(mut self, pause: WaitWindow) -> Self {
        self.request_pause = pause;
        self
    }

    /// Set 429 backoff policy
    pub fn with_throttle(mut self, throttle: ThrottleBackoff) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set inter-chunk pause window
    pub fn with_chunk_pause(mut self, pause: WaitWindow) -> Self {
        self.chunk_pause = pause;
        self
    }

    /// Same limits with every pause disabled.
    pub fn without_waits(self) -> Self {
        self.with_request_pause(WaitWindow::zero())
            .with_throttle(ThrottleBackoff::zero())
            .with_chunk_pause(WaitWindow::zero())
    }

    /// Total request attempts an item may consume.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            location: BLACK_MARKET.to_string(),
            time_scale: TIME_SCALE,
            max_retries: MAX_RETRIES,
            chunk_size: CHUNK_SIZE,
            concurrency: CONCURRENT_REQUESTS,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            request_pause: WaitWindow::from_millis(NORMAL_WAIT_MIN_MS, NORMAL_WAIT_MAX_MS),
            throttle: ThrottleBackoff::default(),
            chunk_pause: WaitWindow::from_millis(CHUNK_WAIT_MIN_MS, CHUNK_WAIT_MAX_MS),
        }
    }
}
