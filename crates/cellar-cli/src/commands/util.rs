//! Shared utilities for CLI commands.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use cellar_core::{Ledger, ProductName};
use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::cli::LedgerArgs;
use crate::config::Config;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: u64 = 1000 * 366;

/// Parse a date as `YYYY-MM-DD`, `today`, or a relative offset from `today`.
///
/// Supports:
/// - ISO 8601 date: "2026-01-15"
/// - "today"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(today);
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15) or relative (e.g., '3 days ago')");
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days = match &caps[2] {
        "day" => n,
        "week" => n.saturating_mul(7),
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if days > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far back: {s}");
    }

    today
        .checked_sub_days(Days::new(days))
        .with_context(|| format!("date out of range: {s}"))
}

/// Reads the ledger named by `args` (or the configured one), keeping only
/// the requested product when `--product` is given.
pub fn load_ledger(args: &LedgerArgs, config: &Config) -> Result<Ledger> {
    let path = args.ledger.as_deref().unwrap_or(config.ledger_path.as_path());
    let ledger = read_ledger(path)?;
    tracing::debug!(
        path = %path.display(),
        open_items = ledger.open_items.len(),
        stocked = ledger.stocked.len(),
        snapshots = ledger.snapshots.len(),
        "loaded ledger"
    );

    match &args.product {
        Some(name) => {
            let product = ProductName::new(name.as_str()).context("invalid --product")?;
            Ok(ledger.for_product(&product))
        }
        None => Ok(ledger),
    }
}

fn read_ledger(path: &Path) -> Result<Ledger> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ledger::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to read ledger {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_date("2026-01-15", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_today_and_relative() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("3 days ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
        );
        assert_eq!(
            parse_date("1 week ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date("yesterday-ish", today()).is_err());
        assert!(parse_date("99999999 days ago", today()).is_err());
    }

    #[test]
    fn test_load_ledger_filters_product() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ledger.json");
        std::fs::write(
            &path,
            r#"{"stocked": [
                {"name": "Gin", "unit_volume": 700, "count": 1},
                {"name": "Rum", "unit_volume": 1000, "count": 2}
            ]}"#,
        )
        .unwrap();

        let args = LedgerArgs {
            ledger: Some(path),
            product: Some("Rum".to_string()),
        };
        let ledger = load_ledger(&args, &Config::default()).unwrap();
        assert_eq!(ledger.stocked.len(), 1);
        assert_eq!(ledger.stocked[0].count, 2);
    }

    #[test]
    fn test_load_ledger_missing_file() {
        let args = LedgerArgs {
            ledger: Some("/nonexistent/ledger.json".into()),
            product: None,
        };
        let err = load_ledger(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }
}
