//! Stock timeline reconstruction.
//!
//! Rebuilds the total volume on hand for every day of a trailing window from
//! two inputs: the stocked counts as they are *now*, and the usage log of
//! every open item. No historical state is read.
//!
//! # Algorithm Summary
//!
//! 1. Infer each open item's open date (see [`crate::opening`]).
//! 2. Per product key, count the items opened inside the window and add them
//!    back to today's stocked count. That is the count at window start.
//! 3. For each day, subtract the items of that key opened on or before the day.
//! 4. Add what is left inside every item already opened by that day.
//!
//! Restocking during the window is invisible to step 2; days before a
//! restock are understated. A [`SnapshotBook`] can replace the stocked part
//! on the days it covers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::trailing_window;
use crate::error::StockError;
use crate::item::{OpenItem, ProductKey, StockedPosition};
use crate::opening::open_date;
use crate::snapshot::SnapshotBook;
use crate::types::OpenTolerance;

/// Configuration for stock reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructConfig {
    /// Number of days in the window, ending today. Default: 30.
    pub window_days: u32,

    /// Tolerance for recognising an opening event. Default: 1e-3.
    pub open_tolerance: OpenTolerance,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            open_tolerance: OpenTolerance::DEFAULT,
        }
    }
}

/// Volume on hand at the end of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPoint {
    pub day: NaiveDate,
    /// Unopened units, in volume.
    pub stocked_volume: f64,
    /// Volume left in opened items.
    pub open_volume: f64,
    pub total_volume: f64,
}

/// Stocked units of one product key over the window.
#[derive(Debug)]
struct StockLine {
    unit_volume: f64,
    current_count: u64,
    /// Open days of items of this key opened on or after the window start, sorted.
    opened: Vec<NaiveDate>,
}

impl StockLine {
    /// Units on the shelf at window start.
    fn initial_count(&self) -> u64 {
        self.current_count + self.opened.len() as u64
    }

    /// Units on the shelf at the end of `day`.
    fn count_on(&self, day: NaiveDate) -> u64 {
        let opened_to_date = self.opened.partition_point(|d| *d <= day) as u64;
        self.initial_count().saturating_sub(opened_to_date)
    }
}

/// One reconstructed day together with the unit counts behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayDetail {
    pub point: StockPoint,
    /// Unopened units on the shelf.
    pub stocked_units: u64,
    /// Opened items still holding liquid.
    pub open_items: usize,
}

/// Liquid left across opened items at the end of one day.
#[derive(Debug, Clone, Copy, Default)]
struct OpenRemainder {
    volume: f64,
    items: usize,
}

/// Reconstructs the daily volume on hand over the window ending `today`.
///
/// `today` must be computed once by the caller; every step of the
/// reconstruction uses it. Returns exactly `config.window_days` points,
/// oldest first.
///
/// # Errors
///
/// Any invalid record rejects the whole call; no partial series is produced.
pub fn reconstruct_stock(
    items: &[OpenItem],
    positions: &[StockedPosition],
    today: NaiveDate,
    config: &ReconstructConfig,
    snapshots: Option<&SnapshotBook>,
) -> Result<Vec<StockPoint>, StockError> {
    let points = reconstruct_days(items, positions, today, config)?
        .into_iter()
        .map(|detail| {
            let mut point = detail.point;
            if let Some(stocked) = snapshots.and_then(|book| book.stocked_volume_on(point.day)) {
                point.stocked_volume = stocked;
                point.total_volume = stocked + point.open_volume;
            }
            point
        })
        .collect();

    Ok(points)
}

/// Backward reconstruction without any snapshot override.
pub fn reconstruct_days(
    items: &[OpenItem],
    positions: &[StockedPosition],
    today: NaiveDate,
    config: &ReconstructConfig,
) -> Result<Vec<DayDetail>, StockError> {
    for item in items {
        item.validate()?;
    }
    for position in positions {
        position.validate()?;
    }

    let window = trailing_window(today, config.window_days)?;
    let window_start = window[0];

    let open_days: Vec<NaiveDate> = items
        .iter()
        .map(|item| open_date(item, config.open_tolerance).day)
        .collect();

    // Positions sharing a key are one product.
    let mut lines: BTreeMap<ProductKey, StockLine> = BTreeMap::new();
    for position in positions {
        let line = lines.entry(position.product_key()).or_insert(StockLine {
            unit_volume: position.unit_volume,
            current_count: 0,
            opened: Vec::new(),
        });
        line.current_count += u64::from(position.count);
    }

    let mut orphans = 0usize;
    for (item, &opened_on) in items.iter().zip(&open_days) {
        match lines.get_mut(&item.product_key()) {
            Some(line) => {
                if opened_on >= window_start {
                    line.opened.push(opened_on);
                }
            }
            None => {
                orphans += 1;
                tracing::debug!(
                    item_id = %item.id,
                    key = %item.product_key(),
                    "open item has no stocked position"
                );
            }
        }
    }
    for line in lines.values_mut() {
        line.opened.sort_unstable();
    }

    tracing::debug!(
        %today,
        window_days = config.window_days,
        items = items.len(),
        products = lines.len(),
        orphans,
        "reconstructing stock timeline"
    );

    let remainders = open_item_remainders(items, &open_days, &window);

    let days = window
        .iter()
        .zip(remainders)
        .map(|(&day, open)| {
            let stocked_volume = stocked_volume_on(&lines, day);
            DayDetail {
                point: StockPoint {
                    day,
                    stocked_volume,
                    open_volume: open.volume,
                    total_volume: stocked_volume + open.volume,
                },
                stocked_units: lines.values().map(|line| line.count_on(day)).sum(),
                open_items: open.items,
            }
        })
        .collect();

    Ok(days)
}

#[allow(clippy::cast_precision_loss)]
fn stocked_volume_on(lines: &BTreeMap<ProductKey, StockLine>, day: NaiveDate) -> f64 {
    lines
        .values()
        .map(|line| line.count_on(day) as f64 * line.unit_volume)
        .sum()
}

/// Per-day liquid left across all opened items.
///
/// Walks each item's draws in day order once, carrying the running total
/// forward across the window. An item counts from its open day onward.
fn open_item_remainders(
    items: &[OpenItem],
    open_days: &[NaiveDate],
    window: &[NaiveDate],
) -> Vec<OpenRemainder> {
    let mut totals = vec![OpenRemainder::default(); window.len()];

    for (item, &opened_on) in items.iter().zip(open_days) {
        let mut draws: Vec<(NaiveDate, f64)> = item
            .events
            .iter()
            .map(|e| (e.day(), e.volume_used))
            .collect();
        draws.sort_by_key(|&(day, _)| day);

        let mut next = 0;
        let mut drawn = 0.0;
        for (total, &day) in totals.iter_mut().zip(window) {
            while next < draws.len() && draws[next].0 <= day {
                drawn += draws[next].1;
                next += 1;
            }
            if opened_on <= day {
                let left = (item.initial_volume - drawn).max(0.0);
                total.volume += left;
                if left > 0.0 {
                    total.items += 1;
                }
            }
        }
    }

    totals
}
