//! Leftover command: volume on hand for each day of the window.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use cellar_core::{Ledger, ReconstructConfig, SnapshotBook, StockPoint, reconstruct_stock};
use chrono::NaiveDate;

use crate::config::DisplayUnit;

/// Reconstructs the timeline, optionally preferring recorded snapshots.
pub fn build_timeline(
    ledger: &Ledger,
    today: NaiveDate,
    config: &ReconstructConfig,
    use_snapshots: bool,
) -> Result<Vec<StockPoint>> {
    let book = if use_snapshots {
        let book = SnapshotBook::new(&ledger.snapshots).context("invalid snapshot")?;
        if book.is_empty() {
            tracing::warn!("--use-snapshots given but the ledger has no snapshots");
        } else {
            tracing::debug!(days = book.len(), "using recorded snapshots");
        }
        Some(book)
    } else {
        None
    };

    reconstruct_stock(
        &ledger.open_items,
        &ledger.stocked,
        today,
        config,
        book.as_ref(),
    )
    .context("failed to reconstruct stock timeline")
}

/// Formats the human-readable leftover table.
pub fn format_leftover(points: &[StockPoint], unit: DisplayUnit) -> String {
    let mut output = String::new();

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        writeln!(
            output,
            "LEFTOVER: {} to {} ({})",
            first.day,
            last.day,
            unit.label()
        )
        .unwrap();
    } else {
        writeln!(output, "LEFTOVER ({})", unit.label()).unwrap();
    }
    writeln!(output).unwrap();
    writeln!(
        output,
        "{:<10}  {:>10}  {:>10}  {:>10}",
        "DAY", "STOCKED", "OPEN", "TOTAL"
    )
    .unwrap();

    for point in points {
        writeln!(
            output,
            "{:<10}  {:>10}  {:>10}  {:>10}",
            point.day.to_string(),
            unit.format(point.stocked_volume),
            unit.format(point.open_volume),
            unit.format(point.total_volume),
        )
        .unwrap();
    }

    output
}

pub fn run<W: Write>(
    writer: &mut W,
    ledger: &Ledger,
    today: NaiveDate,
    config: &ReconstructConfig,
    use_snapshots: bool,
    unit: DisplayUnit,
    json: bool,
) -> Result<()> {
    let points = build_timeline(ledger, today, config, use_snapshots)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&points)?)?;
    } else {
        write!(writer, "{}", format_leftover(&points, unit))?;
    }
    Ok(())
}
