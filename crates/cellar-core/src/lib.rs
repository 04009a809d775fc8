//! Core domain logic for liquid inventory tracking.
//!
//! This crate contains the fundamental types and logic for:
//! - Consumption: usage volume per calendar day
//! - Open dates: inferring when a stocked unit was opened
//! - Reconstruction: daily volume on hand, rebuilt backward from current stock
//!   and the usage log

mod consumption;
pub mod day;
mod error;
pub mod item;
pub mod ledger;
pub mod opening;
mod reconstruct;
pub mod snapshot;
mod summary;
pub mod types;

pub use consumption::{DailyVolume, aggregate_events, daily_consumption, total_between};
pub use error::StockError;
pub use item::{OpenItem, ProductKey, StockedPosition, UsageEvent};
pub use ledger::Ledger;
pub use opening::{OpenDate, OpenDateSource, open_date};
pub use reconstruct::{ReconstructConfig, StockPoint, reconstruct_stock};
pub use snapshot::{InventorySnapshot, SnapshotBook};
pub use summary::{StockSummary, summarize};
pub use types::{ItemId, OpenTolerance, ProductName, ValidationError};
