//! Errors surfaced by the reconstruction engine.

use thiserror::Error;

use crate::types::ValidationError;

/// Invalid input to the engine.
///
/// Any of these aborts the whole computation: a single bad record can shift
/// an open date and skew every later day, so nothing is skipped.
#[derive(Debug, Error)]
pub enum StockError {
    /// A record field failed type-level validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failed to parse a timestamp.
    #[error("invalid timestamp for {record}: {timestamp}")]
    TimestampParse {
        record: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A volume was zero, negative or not finite where a positive amount is required.
    #[error("invalid {field} for {record}: {value}")]
    InvalidVolume {
        record: String,
        field: &'static str,
        value: f64,
    },

    /// The requested window length was zero.
    #[error("window must cover at least one day, got {0}")]
    InvalidWindow(u32),

    /// The window reaches past the earliest representable date.
    #[error("window of {days} days ending {end} is out of range")]
    WindowOutOfRange { days: u32, end: chrono::NaiveDate },

    /// The ledger document could not be decoded.
    #[error("invalid ledger JSON: {0}")]
    Json(#[from] serde_json::Error),
}
