//! Point-in-time totals for the end of the window.

use chrono::NaiveDate;
use serde::Serialize;

use crate::consumption::{daily_consumption, total_between};
use crate::error::StockError;
use crate::item::{OpenItem, StockedPosition};
use crate::reconstruct::{ReconstructConfig, reconstruct_days};

/// What is on hand at the end of `as_of`, and what was drawn in the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub as_of: NaiveDate,
    pub window_start: NaiveDate,
    /// Unopened units on the shelf at the end of `as_of`.
    pub stocked_units: u64,
    pub stocked_volume: f64,
    /// Opened items that still hold liquid on `as_of`.
    pub open_items: usize,
    pub open_volume: f64,
    pub total_volume: f64,
    /// Volume drawn from `window_start` through `as_of`.
    pub consumed_volume: f64,
    /// Usage events logged from `window_start` through `as_of`.
    pub events_in_window: usize,
    /// Consumed volume spread over every day of the window.
    pub daily_average: f64,
}

/// Summarises stock on `today` over the configured window.
///
/// Every figure is taken from the last reconstructed day, so a past `today`
/// agrees with the leftover timeline for that day.
pub fn summarize(
    items: &[OpenItem],
    positions: &[StockedPosition],
    today: NaiveDate,
    config: &ReconstructConfig,
) -> Result<StockSummary, StockError> {
    let days = reconstruct_days(items, positions, today, config)?;
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return Err(StockError::InvalidWindow(config.window_days));
    };
    let window_start = first.point.day;

    let consumed_volume = total_between(&daily_consumption(items), window_start, today);
    let events_in_window = items
        .iter()
        .flat_map(|item| &item.events)
        .filter(|event| (window_start..=today).contains(&event.day()))
        .count();

    Ok(StockSummary {
        as_of: today,
        window_start,
        stocked_units: last.stocked_units,
        stocked_volume: last.point.stocked_volume,
        open_items: last.open_items,
        open_volume: last.point.open_volume,
        total_volume: last.point.total_volume,
        consumed_volume,
        events_in_window,
        daily_average: consumed_volume / f64::from(config.window_days),
    })
}
