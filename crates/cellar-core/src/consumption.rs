//! Daily consumption series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::{OpenItem, UsageEvent};

/// Volume drawn on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub day: NaiveDate,
    pub volume: f64,
}

/// Sums usage per UTC day across all `items`.
///
/// Only days with a positive total are returned, oldest first.
pub fn daily_consumption(items: &[OpenItem]) -> Vec<DailyVolume> {
    aggregate_events(items.iter().flat_map(|item| item.events.iter()))
}

/// Sums a flat stream of usage events per UTC day.
///
/// Days whose total is zero or negative are dropped.
pub fn aggregate_events<'a, I>(events: I) -> Vec<DailyVolume>
where
    I: IntoIterator<Item = &'a UsageEvent>,
{
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for event in events {
        *by_day.entry(event.day()).or_insert(0.0) += event.volume_used;
    }

    by_day
        .into_iter()
        .filter(|(_, volume)| *volume > 0.0)
        .map(|(day, volume)| DailyVolume { day, volume })
        .collect()
}

/// Total volume in `series` on days within `[from, to]`.
pub fn total_between(series: &[DailyVolume], from: NaiveDate, to: NaiveDate) -> f64 {
    series
        .iter()
        .filter(|d| d.day >= from && d.day <= to)
        .map(|d| d.volume)
        .sum()
}
