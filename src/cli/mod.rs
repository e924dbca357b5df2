//! CLI command implementations

use crate::catalog::{items, Catalog};
use crate::harvester::config::{
    HarvestConfig, CHUNK_SIZE, CONCURRENT_REQUESTS, DEFAULT_BASE_URL, MAX_RETRIES,
    REQUEST_TIMEOUT_SECS,
};
use crate::identifier::ItemId;
use crate::BLACK_MARKET;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub mod analyze;
pub mod catalog;
pub mod error;

pub use analyze::AnalyzeArgs;
pub use catalog::{CostArgs, ItemsArgs};
pub use error::CliError;

/// Maximum allowed concurrency; the upstream throttles hard above this
const MAX_CONCURRENCY: usize = 32;

/// Parse and validate concurrency value
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    if value > MAX_CONCURRENCY {
        return Err(format!(
            "concurrency {value} exceeds maximum of {MAX_CONCURRENCY}"
        ));
    }
    Ok(value)
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("chunk size must be at least 1".to_string()),
        Ok(value) => Ok(value),
        Err(_) => Err(format!("'{s}' is not a valid number")),
    }
}

fn parse_return_rate(s: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(s.trim()).map_err(|_| format!("'{s}' is not a valid decimal"))?;
    if value < Decimal::ZERO || value >= Decimal::ONE {
        return Err(format!("return rate {value} must be in [0, 1)"));
    }
    Ok(value)
}

/// Albion Online Black Market crafting profit analyzer
#[derive(Parser, Debug)]
#[command(name = "albion-profit-analyzer")]
#[command(about = "Rank craftable Albion Online items by Black Market profit", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// History API base URL
    #[arg(long, global = true, env = "ALBION_DATA_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Market location queried for price history
    #[arg(long, global = true, env = "ALBION_MARKET", default_value = BLACK_MARKET)]
    pub location: String,

    /// Items fetched concurrently (default: 7, max: 32)
    #[arg(long, global = true, default_value_t = CONCURRENT_REQUESTS, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Retries per item after the first attempt
    #[arg(long, global = true, default_value_t = MAX_RETRIES, value_parser = clap::value_parser!(u32).range(0..=20))]
    pub max_retries: u32,

    /// Items per chunk; chunks run one after another
    #[arg(long, global = true, default_value_t = CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub chunk_size: usize,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Disable pacing and backoff pauses (local mirrors and testing only)
    #[arg(long, global = true, default_value_t = false)]
    pub no_wait: bool,

    /// Expose Prometheus metrics on this address (e.g. 127.0.0.1:9000)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,

    /// JSON file of material prices overriding the built-in table
    #[arg(long, global = true)]
    pub prices: Option<PathBuf>,

    /// Crafting return rate (default: 0.152)
    #[arg(long, global = true, value_parser = parse_return_rate)]
    pub return_rate: Option<Decimal>,
}

impl Cli {
    /// Harvest configuration from the global flags.
    pub fn harvest_config(&self) -> HarvestConfig {
        let config = HarvestConfig::default()
            .with_base_url(self.base_url.clone())
            .with_location(self.location.clone())
            .with_concurrency(self.concurrency)
            .with_max_retries(self.max_retries)
            .with_chunk_size(self.chunk_size)
            .with_request_timeout(Duration::from_secs(self.timeout_secs));

        if self.no_wait {
            config.without_waits()
        } else {
            config
        }
    }

    /// Built-in catalog with `--prices` and `--return-rate` applied.
    pub fn load_catalog(&self) -> Result<Catalog, CliError> {
        let mut catalog = Catalog::builtin();
        if let Some(path) = &self.prices {
            catalog = catalog.with_price_overrides(path)?;
        }
        if let Some(rate) = self.return_rate {
            catalog = catalog.with_return_rate(rate)?;
        }
        Ok(catalog)
    }

    /// Install the Prometheus exporter when `--metrics-addr` is set.
    pub fn install_metrics(&self) -> Result<(), CliError> {
        if let Some(addr) = self.metrics_addr {
            crate::metrics::init_metrics(addr)?;
            info!("Prometheus metrics available at http://{}/metrics", addr);
        }
        Ok(())
    }
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch prices, compute profits and write the CSV report
    Analyze(AnalyzeArgs),

    /// List the item ids an analysis would fetch
    Items(ItemsArgs),

    /// Show recipe and crafting cost for item ids
    Cost(CostArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Which items to analyse; every axis defaults to the built-in lists.
#[derive(Args, Debug, Clone, Default)]
pub struct ItemSelection {
    /// Item names without tier, comma separated (default: every catalog recipe)
    #[arg(long, value_delimiter = ',')]
    pub names: Vec<String>,

    /// Tiers, comma separated (default: T4,T5,T6,T7)
    #[arg(long, value_delimiter = ',')]
    pub tiers: Vec<String>,

    /// Enchantment levels, comma separated, e.g. 0,1,2 (default: 0,1,2)
    #[arg(long, value_delimiter = ',')]
    pub enchants: Vec<String>,
}

impl ItemSelection {
    /// Expand the selection into item ids.
    pub fn resolve(&self, catalog: &Catalog) -> Result<Vec<ItemId>, CliError> {
        let names: Vec<String> = if self.names.is_empty() {
            catalog.item_names().into_iter().map(str::to_string).collect()
        } else {
            self.names
                .iter()
                .map(|n| n.trim().to_uppercase())
                .filter(|n| !n.is_empty())
                .collect()
        };

        let tiers: Vec<String> = if self.tiers.is_empty() {
            items::DEFAULT_TIERS.iter().map(|t| t.to_string()).collect()
        } else {
            self.tiers
                .iter()
                .map(|t| normalize_tier(t))
                .collect::<Result<_, _>>()?
        };

        let enchants: Vec<String> = if self.enchants.is_empty() {
            items::DEFAULT_ENCHANTS.iter().map(|e| e.to_string()).collect()
        } else {
            self.enchants
                .iter()
                .map(|e| {
                    let suffix = items::normalize_enchant(e);
                    if suffix.chars().skip(1).all(|c| c.is_ascii_digit()) {
                        Ok(suffix)
                    } else {
                        Err(CliError::InvalidArgument(format!(
                            "invalid enchantment level '{e}'"
                        )))
                    }
                })
                .collect::<Result<_, _>>()?
        };

        let targets = items::enumerate_items(&names, &tiers, &enchants);
        if targets.is_empty() {
            return Err(CliError::InvalidArgument(
                "item selection is empty".to_string(),
            ));
        }
        Ok(targets)
    }
}

/// Accept `T5`, `t5` or `5`.
fn normalize_tier(raw: &str) -> Result<String, CliError> {
    let raw = raw.trim().to_uppercase();
    let level = raw.strip_prefix('T').unwrap_or(&raw);
    if level.is_empty() || !level.chars().all(|c| c.is_ascii_digit()) {
        return Err(CliError::InvalidArgument(format!("invalid tier '{raw}'")));
    }
    Ok(format!("T{level}"))
}
