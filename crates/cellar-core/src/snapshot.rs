//! Persisted daily stock snapshots.
//!
//! The backward reconstruction cannot see units restocked mid-window. When a
//! storage layer records what was on the shelf each day, those records take
//! precedence over the reconstructed stocked volume for the days they cover.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::types::ProductName;

/// Stocked units of one product recorded on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(alias = "date")]
    pub day: NaiveDate,
    pub name: ProductName,
    #[serde(alias = "volume")]
    pub unit_volume: f64,
    pub count: u32,
}

impl InventorySnapshot {
    pub fn volume(&self) -> f64 {
        f64::from(self.count) * self.unit_volume
    }
}

/// Recorded stocked volume per day, summed across products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotBook {
    by_day: BTreeMap<NaiveDate, f64>,
}

impl SnapshotBook {
    /// Builds a book from snapshot records, rejecting invalid unit volumes.
    pub fn new<'a, I>(snapshots: I) -> Result<Self, StockError>
    where
        I: IntoIterator<Item = &'a InventorySnapshot>,
    {
        let mut by_day = BTreeMap::new();
        for snapshot in snapshots {
            if !snapshot.unit_volume.is_finite() || snapshot.unit_volume <= 0.0 {
                return Err(StockError::InvalidVolume {
                    record: format!("snapshot of {} on {}", snapshot.name, snapshot.day),
                    field: "unit_volume",
                    value: snapshot.unit_volume,
                });
            }
            *by_day.entry(snapshot.day).or_insert(0.0) += snapshot.volume();
        }
        Ok(Self { by_day })
    }

    /// Recorded stocked volume on `day`, if any snapshot covers it.
    pub fn stocked_volume_on(&self, day: NaiveDate) -> Option<f64> {
        self.by_day.get(&day).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }

    /// Number of distinct days covered.
    pub fn len(&self) -> usize {
        self.by_day.len()
    }
}
