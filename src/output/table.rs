//! Console summary table

use crate::ItemProfitRecord;
use rust_decimal::Decimal;

fn cell(value: Option<Decimal>, dp: u32) -> String {
    value
        .map(|v| v.round_dp(dp).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render the first `limit` records as a fixed-width text table.
pub fn render_table(records: &[ItemProfitRecord], limit: usize) -> String {
    let mut out = format!(
        "{:<28} {:>12} {:>12} {:>12} {:>9} {:>8}\n",
        "ITEM", "COST", "AVG PRICE", "PROFIT", "PROFIT %", "TRADES"
    );
    out.push_str(&"-".repeat(86));
    out.push('\n');

    for record in records.iter().take(limit) {
        out.push_str(&format!(
            "{:<28} {:>12} {:>12} {:>12} {:>9} {:>8}\n",
            record.item_id.as_str(),
            cell(record.cost, 0),
            record.weighted_avg_price.round_dp(0),
            cell(record.profit, 0),
            cell(record.profit_pct, 1),
            record.total_trade_count,
        ));
    }

    if records.len() > limit {
        out.push_str(&format!("... {} more rows\n", records.len() - limit));
    }
    out
}
