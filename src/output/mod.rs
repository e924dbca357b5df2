//! Report writers

use crate::ItemProfitRecord;
use std::cmp::Ordering;

pub mod csv;
pub mod table;

/// Default report file name
pub const DEFAULT_OUTPUT_FILE: &str = "item_profit_analysis_7days.csv";

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Generic output writer trait
pub trait OutputWriter {
    /// Flush any buffered data to disk
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}

/// Trait for writing profit records
pub trait ProfitWriter: OutputWriter {
    /// Write a single record
    fn write_record(&mut self, record: &ItemProfitRecord) -> OutputResult<()>;

    /// Write multiple records at once
    fn write_records(&mut self, records: &[ItemProfitRecord]) -> OutputResult<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }
}

/// Sort by `profit_pct` descending, records without a percentage last.
///
/// The sort is stable: ties keep their input order.
pub fn sort_records(records: &mut [ItemProfitRecord]) {
    records.sort_by(|a, b| match (a.profit_pct, b.profit_pct) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
