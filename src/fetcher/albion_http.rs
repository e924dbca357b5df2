//! Albion Online Data Project HTTP client
//!
//! Issues `GET {base}/api/v2/stats/history/{item}?locations=..&time-scale=..`
//! and classifies the response. No retries happen here.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::fetcher::{FetcherError, FetcherResult, HistorySource};
use crate::harvester::HarvestConfig;
use crate::identifier::ItemId;
use crate::metrics::FetchMetrics;

/// HTTP connect timeout (seconds)
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// History endpoint path prefix
pub const HISTORY_PATH: &str = "/api/v2/stats/history";

/// HTTP history source
pub struct AlbionHttpClient {
    client: Client,
    base_url: String,
    location: String,
    time_scale: u32,
}

impl AlbionHttpClient {
    /// Create a client around an existing reqwest client.
    ///
    /// # Arguments
    /// * `client` - reqwest client; its timeout applies to every request
    /// * `base_url` - API base, e.g. `https://east.albion-online-data.com`
    /// * `location` - market location queried
    /// * `time_scale` - history bucket size parameter
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        location: impl Into<String>,
        time_scale: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            location: location.into(),
            time_scale,
        }
    }

    /// Build a client whose requests carry the configured timeout.
    pub fn from_config(config: &HarvestConfig) -> FetcherResult<Self> {
        let client = build_http_client(config.request_timeout)?;
        Ok(Self::new(
            client,
            config.base_url.clone(),
            config.location.clone(),
            config.time_scale,
        ))
    }

    /// Base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full history URL for an item (without query string)
    pub fn history_url(&self, item: &ItemId) -> String {
        format!("{}{}/{}", self.base_url, HISTORY_PATH, item)
    }

    fn query(&self) -> [(&'static str, String); 2] {
        [
            ("locations", self.location.clone()),
            ("time-scale", self.time_scale.to_string()),
        ]
    }
}

/// Build a reqwest client with connect and overall request timeouts.
pub fn build_http_client(request_timeout: Duration) -> FetcherResult<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS).min(request_timeout))
        .timeout(request_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetcherError::ClientError(format!("Failed to build HTTP client: {e}")))
}

/// Map a non-200 status onto a fetcher error.
pub fn classify_status(status: StatusCode, body: &str) -> FetcherError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return FetcherError::RateLimitExceeded;
    }

    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    } else {
        body.chars().take(200).collect()
    };

    FetcherError::HttpError {
        status: status.as_u16(),
        message,
    }
}

/// Map a transport failure onto a fetcher error.
pub fn classify_transport_error(err: &reqwest::Error) -> FetcherError {
    if err.is_timeout() {
        FetcherError::Timeout(err.to_string())
    } else {
        FetcherError::NetworkError(err.to_string())
    }
}

#[async_trait]
impl HistorySource for AlbionHttpClient {
    async fn fetch_history(&self, item: &ItemId) -> FetcherResult<Value> {
        let url = self.history_url(item);
        debug!(item = %item, url = %url, "Requesting price history");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&self.query())
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        FetchMetrics::record_request(status.as_u16(), started.elapsed());

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                FetcherError::Timeout(e.to_string())
            } else {
                FetcherError::ParseError(format!("Failed to decode response body: {e}"))
            }
        })
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn endpoint(&self, item: &ItemId) -> String {
        self.history_url(item)
    }
}
