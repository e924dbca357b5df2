//! Harvest orchestration and concurrency limiting
//!
//! # Overview
//!
//! 1. **Configuration**: every knob lives in an immutable [`HarvestConfig`]
//! 2. **Limiting**: one [`ConcurrencyLimiter`] permit per in-flight item
//! 3. **Chunking**: [`ChunkedHarvester`] runs chunks sequentially, items within
//!    a chunk concurrently, and hands each chunk's points to a callback
//!
//! # Quick Start
//!
//! ```no_run
//! use albion_profit_analyzer::fetcher::albion_http::AlbionHttpClient;
//! use albion_profit_analyzer::harvester::{ChunkedHarvester, HarvestConfig};
//! use albion_profit_analyzer::ItemId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarvestConfig::default().with_concurrency(4);
//! let source = Arc::new(AlbionHttpClient::from_config(&config)?);
//! let harvester = ChunkedHarvester::new(source, config);
//!
//! let items = vec![ItemId::new("T5_MAIN_SWORD"), ItemId::new("T5_MAIN_SWORD@1")];
//! let report = harvester
//!     .harvest(&items, |chunk, points| {
//!         println!("{} items -> {} points", chunk.len(), points.len());
//!     })
//!     .await;
//! assert_eq!(report.total_items, 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Fetch failures never abort a harvest. Items that exhaust their retry
//! budget are listed in [`HarvestReport::failed_items`].

pub mod config;
pub mod executor;
pub mod rate_limit;

pub use config::{HarvestConfig, ThrottleBackoff, WaitWindow};
pub use executor::{ChunkedHarvester, HarvestReport};
pub use rate_limit::{ConcurrencyLimiter, ItemPermit, RateLimitError};
