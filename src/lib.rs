//! # Albion Profit Analyzer Library
//!
//! Fetches Black Market price history for a catalog of craftable Albion
//! Online items, computes each item's crafting cost from a static recipe
//! table, and reports profit margins.
//!
//! ## Quick Start
//!
//! ```no_run
//! use albion_profit_analyzer::aggregate::Aggregator;
//! use albion_profit_analyzer::catalog::{items, Catalog, CostModel};
//! use albion_profit_analyzer::fetcher::albion_http::AlbionHttpClient;
//! use albion_profit_analyzer::harvester::{ChunkedHarvester, HarvestConfig};
//! use chrono::{Duration, Utc};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarvestConfig::default();
//! let catalog = Catalog::builtin();
//! let cost_model = CostModel::new(&catalog);
//!
//! let targets = items::enumerate_items(
//!     &catalog.item_names(),
//!     items::DEFAULT_TIERS,
//!     items::DEFAULT_ENCHANTS,
//! );
//!
//! let source = Arc::new(AlbionHttpClient::from_config(&config)?);
//! let harvester = ChunkedHarvester::new(source, config);
//!
//! let mut aggregator = Aggregator::new(Utc::now() - Duration::days(7));
//! let report = harvester
//!     .harvest(&targets, |chunk, points| aggregator.ingest(chunk, points, &cost_model))
//!     .await;
//!
//! println!("{} records, {} failed items", aggregator.records().len(), report.failed_items.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`identifier`] - Item identifier parsing (`T5_MAIN_SWORD@1`)
//! - [`catalog`] - Static recipe/price tables, cost model, item enumeration
//! - [`fetcher`] - Upstream history API client, response parsing, retrying fetcher
//! - [`harvester`] - Chunked harvest driver, concurrency limiter, configuration
//! - [`aggregate`] - Trade-weighted price aggregation into profit records
//! - [`output`] - Sorting and CSV/console reporting
//! - [`cli`] - Command line interface

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade-weighted aggregation of raw price points
pub mod aggregate;

/// Static recipe and price tables, cost model and item enumeration
pub mod catalog;

/// CLI command implementations
pub mod cli;

/// Upstream history fetchers
pub mod fetcher;

/// Chunked harvest orchestration and concurrency limiting
pub mod harvester;

/// Item identifier parsing
pub mod identifier;

/// Observability metrics
pub mod metrics;

/// Result sorting and writers
pub mod output;

pub use identifier::ItemId;

/// Market location used for every history request.
pub const BLACK_MARKET: &str = "Black Market";

/// Item quality tag reported by the history API.
///
/// Unknown numeric or textual tags are kept rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    /// Quality 1
    Normal,
    /// Quality 2
    Good,
    /// Quality 3
    Outstanding,
    /// Quality 4
    Excellent,
    /// Quality 5
    Masterpiece,
    /// Any tag outside 1-5, or a missing tag
    Other(String),
}

impl Quality {
    /// Map a raw API quality value onto a tag.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Number(n)) => match n.as_i64() {
                Some(1) => Self::Normal,
                Some(2) => Self::Good,
                Some(3) => Self::Outstanding,
                Some(4) => Self::Excellent,
                Some(5) => Self::Masterpiece,
                _ => Self::Other(n.to_string()),
            },
            Some(serde_json::Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(level) => Self::from_json(Some(&serde_json::Value::from(level))),
                Err(_) => Self::Other(s.clone()),
            },
            _ => Self::Other("unknown".to_string()),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Good => write!(f, "good"),
            Self::Outstanding => write!(f, "outstanding"),
            Self::Excellent => write!(f, "excellent"),
            Self::Masterpiece => write!(f, "masterpiece"),
            Self::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// One market observation: the latest history point of one quality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawPricePoint {
    /// Item the observation belongs to
    pub item_id: ItemId,
    /// Quality tag of the time series this point was taken from
    pub quality: Quality,
    /// Observation timestamp (UTC)
    pub timestamp: DateTime<Utc>,
    /// Average trade price in silver
    pub avg_price: Decimal,
    /// Number of items traded
    pub item_count: u64,
    /// Market location
    pub location: String,
}

/// One output row of the profit report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemProfitRecord {
    /// Item identifier
    pub item_id: ItemId,
    /// Tier token (`T5`)
    pub tier: String,
    /// Enchantment suffix (`@1`), empty when unenchanted
    pub enchant: String,
    /// Crafting cost after return rate, `None` when unknown
    pub cost: Option<Decimal>,
    /// Trade-count weighted average sell price
    pub weighted_avg_price: Decimal,
    /// `weighted_avg_price - cost`
    pub profit: Option<Decimal>,
    /// `profit / cost * 100`, `None` when cost is unknown or not positive
    pub profit_pct: Option<Decimal>,
    /// Sum of trade counts of the aggregated points
    pub total_trade_count: u64,
    /// Most recent timestamp among the aggregated points
    pub latest_update: DateTime<Utc>,
}

impl ItemProfitRecord {
    /// Build a record from an aggregated price and an optional cost.
    pub fn new(
        item_id: ItemId,
        cost: Option<Decimal>,
        weighted_avg_price: Decimal,
        total_trade_count: u64,
        latest_update: DateTime<Utc>,
    ) -> Self {
        let profit = cost.and_then(|c| weighted_avg_price.checked_sub(c));
        let profit_pct = match (profit, cost) {
            (Some(p), Some(c)) if c > Decimal::ZERO => p
                .checked_div(c)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
            _ => None,
        };

        Self {
            tier: item_id.tier().to_string(),
            enchant: item_id.enchant_suffix().to_string(),
            item_id,
            cost,
            weighted_avg_price,
            profit,
            profit_pct,
            total_trade_count,
            latest_update,
        }
    }
}
