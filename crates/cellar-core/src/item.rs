//! Open items, stocked positions and the key that joins them.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day::day_of;
use crate::error::StockError;
use crate::types::{ItemId, ProductName};

/// A single draw from an open item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    /// When the volume was drawn.
    pub timestamp: DateTime<Utc>,
    /// How much was drawn, in ledger units.
    pub volume_used: f64,
}

impl UsageEvent {
    /// The UTC calendar day of this event.
    pub fn day(&self) -> NaiveDate {
        day_of(self.timestamp)
    }
}

/// A unit that has been opened and is being drawn down.
///
/// Events are kept in storage order, which is not necessarily chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenItem {
    pub id: ItemId,
    pub name: ProductName,
    /// Unit volume of the stocked product this item was opened from.
    pub initial_volume: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<UsageEvent>,
}

impl OpenItem {
    /// The key of the stocked product this item came from.
    pub fn product_key(&self) -> ProductKey {
        ProductKey::new(self.name.clone(), self.initial_volume)
    }

    /// Rejects non-positive unit volumes and negative or non-finite draws.
    pub fn validate(&self) -> Result<(), StockError> {
        if !self.initial_volume.is_finite() || self.initial_volume <= 0.0 {
            return Err(StockError::InvalidVolume {
                record: format!("open item {}", self.id),
                field: "initial_volume",
                value: self.initial_volume,
            });
        }
        for event in &self.events {
            if !event.volume_used.is_finite() || event.volume_used < 0.0 {
                return Err(StockError::InvalidVolume {
                    record: format!("usage event of {} at {}", self.id, event.timestamp),
                    field: "volume_used",
                    value: event.volume_used,
                });
            }
        }
        Ok(())
    }
}

/// Unopened units of one product on hand right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockedPosition {
    pub name: ProductName,
    /// Volume of a single unit.
    pub unit_volume: f64,
    /// Units on hand as of now.
    pub count: u32,
    /// Free-form label; not part of the product key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl StockedPosition {
    pub fn product_key(&self) -> ProductKey {
        ProductKey::new(self.name.clone(), self.unit_volume)
    }

    /// Volume held by this position right now.
    pub fn volume(&self) -> f64 {
        f64::from(self.count) * self.unit_volume
    }

    /// Rejects non-positive or non-finite unit volumes.
    pub fn validate(&self) -> Result<(), StockError> {
        if !self.unit_volume.is_finite() || self.unit_volume <= 0.0 {
            return Err(StockError::InvalidVolume {
                record: format!("stocked position {}", self.name),
                field: "unit_volume",
                value: self.unit_volume,
            });
        }
        Ok(())
    }
}

/// `(name, unit_volume)` identity shared by open items and stocked positions.
///
/// Volumes compare by exact bit pattern, so `700.0` and `700.0000001` are
/// different products.
#[derive(Debug, Clone)]
pub struct ProductKey {
    pub name: ProductName,
    pub unit_volume: f64,
}

impl ProductKey {
    pub const fn new(name: ProductName, unit_volume: f64) -> Self {
        Self { name, unit_volume }
    }
}

impl PartialEq for ProductKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.unit_volume.to_bits() == other.unit_volume.to_bits()
    }
}

impl Eq for ProductKey {}

impl Hash for ProductKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.unit_volume.to_bits().hash(state);
    }
}

impl PartialOrd for ProductKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProductKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.unit_volume.total_cmp(&other.unit_volume))
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.unit_volume)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn item(initial_volume: f64, events: Vec<UsageEvent>) -> OpenItem {
        OpenItem {
            id: ItemId::new("b1").unwrap(),
            name: ProductName::new("Gin").unwrap(),
            initial_volume,
            created_at: ts(1, 9),
            events,
        }
    }

    fn draw(day: u32, volume_used: f64) -> UsageEvent {
        UsageEvent {
            timestamp: ts(day, 20),
            volume_used,
        }
    }

    #[test]
    fn test_validate_rejects_bad_volumes() {
        assert!(item(0.0, vec![]).validate().is_err());
        assert!(item(f64::NAN, vec![]).validate().is_err());
        assert!(item(700.0, vec![draw(2, -1.0)]).validate().is_err());
        assert!(item(700.0, vec![draw(2, f64::INFINITY)]).validate().is_err());
        assert!(item(700.0, vec![draw(2, 0.0)]).validate().is_ok());
    }

    #[test]
    fn test_stocked_position_rejects_non_positive_unit_volume() {
        let position = StockedPosition {
            name: ProductName::new("Rum").unwrap(),
            unit_volume: -700.0,
            count: 1,
            color: None,
        };
        let err = position.validate().unwrap_err();
        assert!(matches!(
            err,
            StockError::InvalidVolume {
                field: "unit_volume",
                ..
            }
        ));
    }

    #[test]
    fn test_product_keys_join_on_name_and_volume() {
        let bottle = item(700.0, vec![]);
        let position = StockedPosition {
            name: ProductName::new("Gin").unwrap(),
            unit_volume: 700.0,
            count: 2,
            color: Some("green".to_string()),
        };
        assert_eq!(bottle.product_key(), position.product_key());

        let other = StockedPosition {
            unit_volume: 1000.0,
            ..position
        };
        assert_ne!(bottle.product_key(), other.product_key());
    }
}
