//! Calendar-day helpers shared by the aggregator and the reconstructor.
//!
//! Every timestamp is truncated to its UTC calendar day. Using one truncation
//! everywhere keeps "events on or before day D" consistent between the
//! consumption series and the stock timeline.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};

use crate::error::StockError;

/// Naive timestamp layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// The UTC calendar day containing `ts`.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// The `days` consecutive calendar days ending on `today`, oldest first.
pub fn trailing_window(today: NaiveDate, days: u32) -> Result<Vec<NaiveDate>, StockError> {
    if days == 0 {
        return Err(StockError::InvalidWindow(days));
    }
    let start = today
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .ok_or(StockError::WindowOutOfRange { days, end: today })?;
    Ok(start.iter_days().take(days as usize).collect())
}

/// Parses a ledger timestamp.
///
/// Accepts RFC 3339 (any offset, normalised to UTC) and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, which is taken to already be UTC.
/// `record` names the owning record in the error.
pub fn parse_timestamp(record: &str, raw: &str) -> Result<DateTime<Utc>, StockError> {
    let raw_trimmed = raw.trim();
    let mut last_err = match DateTime::parse_from_rfc3339(raw_trimmed) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };
    for format in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(raw_trimmed, format) {
            Ok(naive) => return Ok(naive.and_utc()),
            Err(e) => last_err = e,
        }
    }
    Err(StockError::TimestampParse {
        record: record.to_string(),
        timestamp: raw.to_string(),
        source: last_err,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_is_dense_and_ends_today() {
        let today = date(2026, 3, 2);
        let window = trailing_window(today, 5).unwrap();
        assert_eq!(
            window,
            vec![
                date(2026, 2, 26),
                date(2026, 2, 27),
                date(2026, 2, 28),
                date(2026, 3, 1),
                date(2026, 3, 2),
            ]
        );
    }

    #[test]
    fn test_window_of_one_day_is_today() {
        let today = date(2026, 1, 1);
        assert_eq!(trailing_window(today, 1).unwrap(), vec![today]);
    }

    #[test]
    fn test_window_rejects_zero_days() {
        let err = trailing_window(date(2026, 1, 1), 0).unwrap_err();
        assert!(matches!(err, StockError::InvalidWindow(0)));
    }

    #[test]
    fn test_window_rejects_underflow() {
        let err = trailing_window(NaiveDate::MIN, 2).unwrap_err();
        assert!(matches!(err, StockError::WindowOutOfRange { days: 2, .. }));
    }

    #[test]
    fn test_day_of_uses_utc() {
        let ts = DateTime::parse_from_rfc3339("2026-03-01T23:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(day_of(ts), date(2026, 3, 2));
    }

    #[test]
    fn test_parse_timestamp_accepts_rfc3339_and_naive() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 18, 45, 0).unwrap();
        assert_eq!(parse_timestamp("x", "2026-03-01T18:45:00Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("x", "2026-03-01T20:45:00+02:00").unwrap(),
            expected
        );
        assert_eq!(parse_timestamp("x", "2026-03-01T18:45:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("x", "2026-03-01 18:45:00.000000").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_timestamp_reports_record() {
        let err = parse_timestamp("open item b7", "yesterday").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid timestamp for open item b7: yesterday"
        );
    }
}
