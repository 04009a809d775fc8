//! Ledger documents: the engine's input as handed over by the storage layer.
//!
//! Timestamps arrive as text and are parsed here, once. A single malformed
//! timestamp rejects the whole ledger.
//!
//! Field names follow the inventory API (`bottles`, `opening_events`,
//! `inventory`, `volume`) as aliases, so its JSON can be fed in directly.

use std::io::Read;

use serde::Deserialize;

use crate::day::parse_timestamp;
use crate::error::StockError;
use crate::item::{OpenItem, StockedPosition, UsageEvent};
use crate::snapshot::InventorySnapshot;
use crate::types::{ItemId, ProductName};

/// All inputs for one engine invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub open_items: Vec<OpenItem>,
    pub stocked: Vec<StockedPosition>,
    pub snapshots: Vec<InventorySnapshot>,
}

impl Ledger {
    /// Decodes a ledger from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StockError> {
        let document: LedgerDocument = serde_json::from_str(json)?;
        document.into_ledger()
    }

    /// Decodes a ledger from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StockError> {
        let document: LedgerDocument = serde_json::from_reader(reader)?;
        document.into_ledger()
    }

    /// A ledger holding only records for `product`.
    #[must_use]
    pub fn for_product(&self, product: &ProductName) -> Self {
        Self {
            open_items: self
                .open_items
                .iter()
                .filter(|i| &i.name == product)
                .cloned()
                .collect(),
            stocked: self
                .stocked
                .iter()
                .filter(|p| &p.name == product)
                .cloned()
                .collect(),
            snapshots: self
                .snapshots
                .iter()
                .filter(|s| &s.name == product)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LedgerDocument {
    #[serde(default, alias = "bottles")]
    open_items: Vec<OpenItemRecord>,
    #[serde(default, alias = "inventory")]
    stocked: Vec<StockedRecord>,
    #[serde(default)]
    snapshots: Vec<InventorySnapshot>,
}

impl LedgerDocument {
    fn into_ledger(self) -> Result<Ledger, StockError> {
        let open_items = self
            .open_items
            .into_iter()
            .map(OpenItemRecord::into_item)
            .collect::<Result<Vec<_>, _>>()?;
        let stocked = self
            .stocked
            .into_iter()
            .map(StockedRecord::into_position)
            .collect();
        Ok(Ledger {
            open_items,
            stocked,
            snapshots: self.snapshots,
        })
    }
}

/// Storage IDs may be integers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    fn into_item_id(self) -> Result<ItemId, StockError> {
        let raw = match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        };
        Ok(ItemId::new(raw)?)
    }
}

#[derive(Debug, Deserialize)]
struct OpenItemRecord {
    id: RecordId,
    name: ProductName,
    initial_volume: f64,
    created_at: String,
    #[serde(default, alias = "opening_events")]
    events: Vec<UsageEventRecord>,
}

impl OpenItemRecord {
    fn into_item(self) -> Result<OpenItem, StockError> {
        let id = self.id.into_item_id()?;
        let created_at = parse_timestamp(&format!("open item {id}"), &self.created_at)?;
        let events = self
            .events
            .into_iter()
            .map(|e| {
                Ok(UsageEvent {
                    timestamp: parse_timestamp(&format!("usage event of {id}"), &e.timestamp)?,
                    volume_used: e.volume_used,
                })
            })
            .collect::<Result<Vec<_>, StockError>>()?;
        Ok(OpenItem {
            id,
            name: self.name,
            initial_volume: self.initial_volume,
            created_at,
            events,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UsageEventRecord {
    timestamp: String,
    volume_used: f64,
}

#[derive(Debug, Deserialize)]
struct StockedRecord {
    name: ProductName,
    #[serde(alias = "volume")]
    unit_volume: f64,
    count: u32,
    #[serde(default)]
    color: Option<String>,
}

impl StockedRecord {
    fn into_position(self) -> StockedPosition {
        StockedPosition {
            name: self.name,
            unit_volume: self.unit_volume,
            count: self.count,
            color: self.color.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    const BACKEND_JSON: &str = r#"{
        "bottles": [
            {
                "id": 7,
                "name": "Gin",
                "initial_volume": 700.0,
                "current_volume": 400.0,
                "created_at": "2026-03-01T10:00:00.123456",
                "opening_events": [
                    {"id": 1, "bottle_id": 7, "timestamp": "2026-03-02T18:00:00+00:00", "volume_used": 700.0},
                    {"id": 2, "bottle_id": 7, "timestamp": "2026-03-03T19:30:00Z", "volume_used": 40.0}
                ]
            }
        ],
        "inventory": [
            {"id": 1, "name": "Gin", "color": "", "volume": 700, "count": 2, "created_at": "2026-01-01T00:00:00"}
        ],
        "snapshots": [
            {"date": "2026-03-01", "name": "Gin", "volume": 700, "count": 3}
        ]
    }"#;

    #[test]
    fn test_decodes_backend_shapes() {
        let ledger = Ledger::from_json(BACKEND_JSON).unwrap();

        assert_eq!(ledger.open_items.len(), 1);
        let item = &ledger.open_items[0];
        assert_eq!(item.id.as_str(), "7");
        assert_eq!(item.events.len(), 2);
        assert_eq!(
            item.events[0].timestamp,
            Utc.with_ymd_and_hms(2026, 3, 2, 18, 0, 0).unwrap()
        );

        assert_eq!(ledger.stocked.len(), 1);
        assert_eq!(ledger.stocked[0].count, 2);
        assert_eq!(ledger.stocked[0].color, None);

        assert_eq!(
            ledger.snapshots[0].day,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_empty_document_is_empty_ledger() {
        assert_eq!(Ledger::from_json("{}").unwrap(), Ledger::default());
    }

    #[test]
    fn test_malformed_event_timestamp_rejects_ledger() {
        let json = r#"{
            "open_items": [{
                "id": "b1", "name": "Rum", "initial_volume": 1000,
                "created_at": "2026-03-01T10:00:00Z",
                "events": [{"timestamp": "03/02/2026", "volume_used": 10}]
            }]
        }"#;
        let err = Ledger::from_json(json).unwrap_err();
        assert!(matches!(err, StockError::TimestampParse { .. }));
        assert!(err.to_string().contains("usage event of b1"));
    }

    #[test]
    fn test_negative_count_is_a_decode_error() {
        let json = r#"{"stocked": [{"name": "Rum", "unit_volume": 1000, "count": -1}]}"#;
        assert!(matches!(
            Ledger::from_json(json).unwrap_err(),
            StockError::Json(_)
        ));
    }

    #[test]
    fn test_for_product_filters_every_collection() {
        let ledger = Ledger::from_json(BACKEND_JSON).unwrap();
        let rum = ledger.for_product(&ProductName::new("Rum").unwrap());
        assert_eq!(rum, Ledger::default());

        let gin = ledger.for_product(&ProductName::new("Gin").unwrap());
        assert_eq!(gin, ledger);
    }
}
