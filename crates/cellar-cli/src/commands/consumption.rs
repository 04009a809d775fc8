//! Consumption command: volume drawn per day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use cellar_core::{DailyVolume, Ledger, daily_consumption};

use crate::config::DisplayUnit;

/// Formats the human-readable consumption table.
pub fn format_consumption(series: &[DailyVolume], unit: DisplayUnit) -> String {
    let mut output = String::new();

    writeln!(output, "CONSUMPTION ({}/day)", unit.label()).unwrap();
    writeln!(output, "───────────").unwrap();

    if series.is_empty() {
        writeln!(output, "No usage recorded.").unwrap();
        return output;
    }

    for point in series {
        writeln!(output, "{}  {:>10}", point.day, unit.format(point.volume)).unwrap();
    }

    let total: f64 = series.iter().map(|p| p.volume).sum();
    writeln!(output).unwrap();
    writeln!(output, "Total:      {:>10}", unit.format(total)).unwrap();

    output
}

pub fn run<W: Write>(writer: &mut W, ledger: &Ledger, unit: DisplayUnit, json: bool) -> Result<()> {
    let series = daily_consumption(&ledger.open_items);
    tracing::debug!(days = series.len(), "aggregated consumption");

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&series)?)?;
    } else {
        write!(writer, "{}", format_consumption(&series, unit))?;
    }
    Ok(())
}
