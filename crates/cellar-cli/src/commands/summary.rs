//! Summary command: stock on hand at the end of the window and usage over it.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use cellar_core::{Ledger, ReconstructConfig, StockSummary, summarize};
use chrono::NaiveDate;

use crate::config::DisplayUnit;

/// Formats the human-readable summary.
pub fn format_summary(summary: &StockSummary, unit: DisplayUnit) -> String {
    let mut output = String::new();

    writeln!(output, "STOCK SUMMARY: {} ({})", summary.as_of, unit.label()).unwrap();
    writeln!(output, "─────────────").unwrap();
    writeln!(
        output,
        "Stocked:   {:>10}  ({} units)",
        unit.format(summary.stocked_volume),
        summary.stocked_units
    )
    .unwrap();
    writeln!(
        output,
        "Open:      {:>10}  ({} items)",
        unit.format(summary.open_volume),
        summary.open_items
    )
    .unwrap();
    writeln!(output, "Total:     {:>10}", unit.format(summary.total_volume)).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Consumed since {}: {}",
        summary.window_start,
        unit.format(summary.consumed_volume)
    )
    .unwrap();
    writeln!(output, "Usage events:   {}", summary.events_in_window).unwrap();
    writeln!(
        output,
        "Daily average:  {}",
        unit.format(summary.daily_average)
    )
    .unwrap();

    output
}

pub fn run<W: Write>(
    writer: &mut W,
    ledger: &Ledger,
    today: NaiveDate,
    config: &ReconstructConfig,
    unit: DisplayUnit,
    json: bool,
) -> Result<()> {
    let summary = summarize(&ledger.open_items, &ledger.stocked, today, config)
        .context("failed to summarize stock")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_summary(&summary, unit))?;
    }
    Ok(())
}
