//! CLI error types and conversions

use crate::catalog::CatalogError;
use crate::fetcher::FetcherError;
use crate::identifier::IdentifierError;
use crate::metrics::MetricsError;
use crate::output::OutputError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Identifier error
    #[error("identifier error: {0}")]
    IdentifierError(#[from] IdentifierError),

    /// Catalog error
    #[error("catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    /// Fetcher error (client construction only; per-item fetch failures are
    /// reported, not raised)
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Metrics exporter error
    #[error("metrics error: {0}")]
    MetricsError(#[from] MetricsError),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No item had a fresh trade; nothing was written
    #[error("no fresh trade data for any of {items} items ({failed} failed to fetch); no report written")]
    NoFreshData {
        /// Items requested
        items: usize,
        /// Items whose fetch was exhausted
        failed: usize,
    },
}
