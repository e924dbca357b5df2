//! Analyze command: harvest, aggregate, report

use crate::aggregate::{freshness_cutoff, Aggregator, FRESHNESS_DAYS};
use crate::catalog::CostModel;
use crate::fetcher::albion_http::AlbionHttpClient;
use crate::harvester::config::TIME_SCALE;
use crate::harvester::{ChunkedHarvester, HarvestReport};
use crate::output::{self, csv::write_report, table::render_table, DEFAULT_OUTPUT_FILE};
use crate::ItemProfitRecord;
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::{Cli, CliError, ItemSelection, OutputFormat};

/// Analyze command arguments
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub selection: ItemSelection,

    /// CSV report path
    #[arg(long, short, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Only trades newer than this many days count
    #[arg(long, default_value_t = FRESHNESS_DAYS, value_parser = clap::value_parser!(i64).range(1..=365))]
    pub freshness_days: i64,

    /// History time scale (hours per history point)
    #[arg(long, default_value_t = TIME_SCALE)]
    pub time_scale: u32,

    /// Rows shown in the console summary
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

impl AnalyzeArgs {
    /// Run the full analysis and write the report.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        cli.install_metrics()?;

        let catalog = cli.load_catalog()?;
        let cost_model = CostModel::new(&catalog);
        let targets = self.selection.resolve(&catalog)?;

        let config = cli.harvest_config().with_time_scale(self.time_scale);
        let source = Arc::new(AlbionHttpClient::from_config(&config)?);
        let harvester = ChunkedHarvester::new(source, config);

        // Fixed once so every chunk is judged against the same window.
        let run_start = Utc::now();
        let mut aggregator = Aggregator::new(freshness_cutoff(run_start, self.freshness_days));

        info!(
            items = targets.len(),
            cutoff = %aggregator.cutoff(),
            output = %self.output.display(),
            "Starting analysis"
        );

        let progress = create_progress_bar(targets.len() as u64);
        let report = harvester
            .harvest(&targets, |chunk, points| {
                aggregator.ingest(chunk, points, &cost_model);
                progress.inc(chunk.len() as u64);
            })
            .await;
        progress.finish_and_clear();

        let mut records = aggregator.into_records();
        if records.is_empty() {
            eprintln!(
                "\nNo item had a trade in the last {} days; nothing written.",
                self.freshness_days
            );
            return Err(CliError::NoFreshData {
                items: report.total_items,
                failed: report.failed_items.len(),
            });
        }

        output::sort_records(&mut records);
        let written = write_report(&self.output, &records)?;

        match self.format {
            OutputFormat::Json => output_json(&self.output, written, &report, &records, self.top)?,
            OutputFormat::Human => output_human(&self.output, written, &report, &records, self.top),
        }

        if !report.is_complete() {
            warn!(
                failed = report.failed_items.len(),
                "Report written without the failed items"
            );
        }
        Ok(())
    }
}

fn create_progress_bar(total_items: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_items);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} items ({percent}%) {msg}",
    )
    .map(|style| style.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("Fetching price history");
    pb
}

fn output_json(
    path: &Path,
    written: u64,
    report: &HarvestReport,
    records: &[ItemProfitRecord],
    top: usize,
) -> Result<(), CliError> {
    let failed: Vec<&str> = report.failed_items.iter().map(|i| i.as_str()).collect();
    let output = serde_json::json!({
        "success": true,
        "output_path": path.display().to_string(),
        "items": report.total_items,
        "items_fetched": report.succeeded,
        "records_written": written,
        "points": report.points,
        "failed_items": failed,
        "elapsed_secs": report.elapsed.as_secs_f64(),
        "top": &records[..records.len().min(top)],
    });
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn output_human(
    path: &Path,
    written: u64,
    report: &HarvestReport,
    records: &[ItemProfitRecord],
    top: usize,
) {
    println!("\nAnalysis completed!");
    println!("Output: {}", path.display());
    println!("Items fetched: {}/{}", report.succeeded, report.total_items);
    println!("Records written: {written}");
    if !report.failed_items.is_empty() {
        let failed: Vec<&str> = report.failed_items.iter().map(|i| i.as_str()).collect();
        println!("Failed items ({}): {}", failed.len(), failed.join(", "));
    }
    if top > 0 {
        println!("\n{}", render_table(records, top));
    }
}
