//! History response parser
//!
//! The history endpoint returns one time series per quality level:
//!
//! ```json
//! [
//!   {"location": "Black Market", "item_id": "T5_BAG", "quality": 1,
//!    "data": [{"item_count": 3, "avg_price": 4120, "timestamp": "2024-05-01T00:00:00"}]}
//! ]
//! ```
//!
//! Only the most recent entry of each series is kept.

use crate::fetcher::{FetcherError, FetcherResult};
use crate::identifier::ItemId;
use crate::{Quality, RawPricePoint};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// Stateless parser for history responses
pub struct HistoryParser;

/// One decoded entry of a quality series
#[derive(Debug, Clone, PartialEq)]
struct HistoryEntry {
    timestamp: DateTime<Utc>,
    avg_price: Decimal,
    item_count: u64,
}

impl HistoryParser {
    /// Parse a response body into one point per quality series.
    ///
    /// # Errors
    /// Returns [`FetcherError::ParseError`] when the body is not an array.
    /// Malformed entries inside a series are skipped; a series without any
    /// usable entry yields no point.
    pub fn latest_points(
        item: &ItemId,
        location: &str,
        body: &Value,
    ) -> FetcherResult<Vec<RawPricePoint>> {
        let series = body.as_array().ok_or_else(|| {
            FetcherError::ParseError(format!("History response for {item} is not an array"))
        })?;

        let mut points = Vec::with_capacity(series.len());
        for record in series {
            let quality = Quality::from_json(record.get("quality"));

            let Some(entries) = record.get("data").and_then(Value::as_array) else {
                debug!(item = %item, quality = %quality, "Quality series without data");
                continue;
            };

            let latest = entries
                .iter()
                .filter_map(|entry| match Self::parse_entry(entry) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        warn!(item = %item, quality = %quality, error = %e, "Skipping history entry");
                        None
                    }
                })
                .max_by_key(|entry| entry.timestamp);

            if let Some(entry) = latest {
                points.push(RawPricePoint {
                    item_id: item.clone(),
                    quality,
                    timestamp: entry.timestamp,
                    avg_price: entry.avg_price,
                    item_count: entry.item_count,
                    location: location.to_string(),
                });
            }
        }

        Ok(points)
    }

    fn parse_entry(entry: &Value) -> FetcherResult<HistoryEntry> {
        let timestamp = entry
            .get("timestamp")
            .and_then(Value::as_str)
            .ok_or_else(|| FetcherError::ParseError("Missing timestamp".to_string()))
            .and_then(parse_timestamp)?;

        let avg_price = match entry.get("avg_price") {
            None | Some(Value::Null) => Decimal::ZERO,
            Some(value) => Self::parse_decimal(value, "avg_price")?,
        };
        if avg_price < Decimal::ZERO {
            return Err(FetcherError::ParseError(format!(
                "Negative avg_price {avg_price}"
            )));
        }

        let item_count = match entry.get("item_count") {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_u64().ok_or_else(|| {
                FetcherError::ParseError(format!("Invalid item_count: {value}"))
            })?,
        };

        Ok(HistoryEntry {
            timestamp,
            avg_price,
            item_count,
        })
    }

    fn parse_decimal(value: &Value, field_name: &str) -> FetcherResult<Decimal> {
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => {
                return Err(FetcherError::ParseError(format!(
                    "{field_name} is not numeric: {other}"
                )))
            }
        };

        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|e| FetcherError::ParseError(format!("Failed to parse {field_name}: {e}")))
    }
}

/// Parse an API timestamp.
///
/// Accepts RFC 3339 with an offset, and naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// which is taken as UTC.
pub fn parse_timestamp(input: &str) -> FetcherResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| FetcherError::ParseError(format!("Invalid timestamp '{input}': {e}")))
}
