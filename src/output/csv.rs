//! CSV report writer

use crate::ItemProfitRecord;
use chrono::SecondsFormat;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, OutputWriter, ProfitWriter};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// Decimal places kept for prices and percentages in the report
const REPORT_DECIMALS: u32 = 4;

/// CSV row; `None` values serialize as empty cells
#[derive(Debug, Serialize)]
struct ProfitRow {
    item_id: String,
    tier: String,
    enchant: String,
    cost: Option<String>,
    avg_price: String,
    profit: Option<String>,
    profit_pct: Option<String>,
    trade_count: u64,
    latest_update: String,
}

impl From<&ItemProfitRecord> for ProfitRow {
    fn from(record: &ItemProfitRecord) -> Self {
        let fmt = |d: rust_decimal::Decimal| d.round_dp(REPORT_DECIMALS).normalize().to_string();
        Self {
            item_id: record.item_id.to_string(),
            tier: record.tier.clone(),
            enchant: record.enchant.clone(),
            cost: record.cost.map(fmt),
            avg_price: fmt(record.weighted_avg_price),
            profit: record.profit.map(fmt),
            profit_pct: record.profit_pct.map(fmt),
            trade_count: record.total_trade_count,
            latest_update: record
                .latest_update
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// CSV writer for profit records
pub struct CsvProfitWriter {
    writer: Writer<BufWriter<File>>,
    records_written: u64,
}

impl CsvProfitWriter {
    /// Create a new CSV writer, creating parent directories as needed.
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        Self::new_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new CSV writer with a custom buffer size
    pub fn new_with_buffer_size<P: AsRef<Path>>(
        path: P,
        buffer_size: usize,
    ) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV writer: path={}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    OutputError::IoError(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

        let buf_writer = BufWriter::with_capacity(buffer_size, file);
        let csv_writer = Writer::from_writer(buf_writer);

        debug!("CSV writer created (headers will be written on first serialize)");

        Ok(Self {
            writer: csv_writer,
            records_written: 0,
        })
    }

    /// Get number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

impl ProfitWriter for CsvProfitWriter {
    fn write_record(&mut self, record: &ItemProfitRecord) -> OutputResult<()> {
        self.writer
            .serialize(ProfitRow::from(record))
            .map_err(|e| OutputError::CsvError(format!("Failed to write record: {}", e)))?;

        self.records_written += 1;
        Ok(())
    }
}

impl OutputWriter for CsvProfitWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))
    }

    fn close(mut self) -> OutputResult<()> {
        self.flush()?;

        let buf_writer = self.writer.into_inner().map_err(|e| {
            OutputError::IoError(format!("Failed to get inner writer: {}", e))
        })?;

        let file = buf_writer.into_inner().map_err(|e| {
            OutputError::IoError(format!("Failed to get file handle: {}", e))
        })?;

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))?;

        info!(
            "CSV writer closed successfully: {} records written",
            self.records_written
        );
        Ok(())
    }
}

/// Write a full report in one call.
pub fn write_report<P: AsRef<Path>>(path: P, records: &[ItemProfitRecord]) -> OutputResult<u64> {
    let mut writer = CsvProfitWriter::new(path)?;
    writer.write_records(records)?;
    let written = writer.records_written();
    writer.close()?;
    Ok(written)
}
