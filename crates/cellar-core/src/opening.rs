//! Inferring the day an open item left stock.
//!
//! Opening a stocked unit logs a usage event for the unit's full volume. The
//! earliest such event marks the day the unit was opened. Items without one
//! (added by hand, or whose log was edited) fall back to their creation day.

use chrono::NaiveDate;

use crate::day::day_of;
use crate::item::OpenItem;
use crate::types::OpenTolerance;

/// How an item's open date was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDateSource {
    /// A usage event matched the item's full volume.
    OpeningEvent,
    /// No event matched; the creation day was used.
    CreatedAt,
}

/// The day an item was opened, and how that was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenDate {
    pub day: NaiveDate,
    pub source: OpenDateSource,
}

/// Infers the calendar day `item` was opened.
///
/// Among events whose `volume_used` is within `tolerance` of
/// `initial_volume`, the one with the earliest timestamp wins. Storage order
/// is ignored.
pub fn open_date(item: &OpenItem, tolerance: OpenTolerance) -> OpenDate {
    let mut matching = item
        .events
        .iter()
        .filter(|e| tolerance.matches(e.volume_used, item.initial_volume));

    let Some(first) = matching.next() else {
        return OpenDate {
            day: day_of(item.created_at),
            source: OpenDateSource::CreatedAt,
        };
    };

    let mut earliest = first;
    let mut candidates = 1usize;
    for event in matching {
        candidates += 1;
        if event.timestamp < earliest.timestamp {
            earliest = event;
        }
    }
    if candidates > 1 {
        tracing::debug!(
            item_id = %item.id,
            candidates,
            chosen = %earliest.timestamp,
            "multiple opening events, using earliest"
        );
    }

    OpenDate {
        day: earliest.day(),
        source: OpenDateSource::OpeningEvent,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::item::UsageEvent;
    use crate::types::{ItemId, ProductName};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn bottle(initial_volume: f64, created_day: u32, events: &[(u32, f64)]) -> OpenItem {
        OpenItem {
            id: ItemId::new("b1").unwrap(),
            name: ProductName::new("Vodka").unwrap(),
            initial_volume,
            created_at: ts(created_day),
            events: events
                .iter()
                .map(|&(day, volume_used)| UsageEvent {
                    timestamp: ts(day),
                    volume_used,
                })
                .collect(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_near_full_draw_is_the_opening_event() {
        let item = bottle(500.0, 1, &[(4, 499.9995)]);
        let opened = open_date(&item, OpenTolerance::default());
        assert_eq!(opened.day, day(4));
        assert_eq!(opened.source, OpenDateSource::OpeningEvent);
    }

    #[test]
    fn test_partial_draws_fall_back_to_creation_day() {
        let item = bottle(700.0, 2, &[(4, 100.0), (6, 200.0)]);
        let opened = open_date(&item, OpenTolerance::default());
        assert_eq!(opened.day, day(2));
        assert_eq!(opened.source, OpenDateSource::CreatedAt);
    }

    #[test]
    fn test_no_events_fall_back_to_creation_day() {
        let item = bottle(700.0, 9, &[]);
        assert_eq!(open_date(&item, OpenTolerance::default()).day, day(9));
    }

    #[test]
    fn test_earliest_opening_event_wins_regardless_of_order() {
        let item = bottle(700.0, 1, &[(8, 700.0), (3, 700.0), (5, 50.0)]);
        assert_eq!(open_date(&item, OpenTolerance::default()).day, day(3));
    }

    #[test]
    fn test_wider_tolerance_accepts_looser_matches() {
        let item = bottle(700.0, 1, &[(3, 699.5)]);
        assert_eq!(
            open_date(&item, OpenTolerance::default()).source,
            OpenDateSource::CreatedAt
        );
        let loose = OpenTolerance::new(1.0).unwrap();
        assert_eq!(open_date(&item, loose).day, day(3));
    }
}
