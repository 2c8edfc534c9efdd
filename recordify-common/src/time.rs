//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Last timestamp handed out by [`monotonic_now`], in microseconds
static LAST_ISSUED_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Current UTC timestamp, strictly later than any previously returned one
///
/// Within a process, two calls never return the same microsecond even if the
/// wall clock stalls or steps backwards. Used for write timestamps that act
/// as a recency sort key.
pub fn monotonic_now() -> DateTime<Utc> {
    let wall = Utc::now();
    let wall_micros = wall.timestamp_micros();

    let previous = LAST_ISSUED_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(wall_micros.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    let issued = wall_micros.max(previous.saturating_add(1));

    DateTime::<Utc>::from_timestamp_micros(issued).unwrap_or(wall)
}

/// Format a timestamp for storage in a TEXT column
///
/// Fixed-width RFC 3339 with microseconds and a `Z` suffix, so that
/// lexicographic order of stored values equals chronological order.
pub fn to_db_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_monotonic_now_tracks_wall_clock() {
        let before = Utc::now();
        let issued = monotonic_now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(issued.timestamp() > 946_684_800);
        assert!(issued >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn test_monotonic_now_strictly_increases() {
        let mut previous = monotonic_now();
        for _ in 0..1000 {
            let next = monotonic_now();
            assert!(next > previous, "{} should be after {}", next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_db_string_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(to_db_string(&whole), "2024-05-01T12:00:00.000000Z");

        let later = whole + chrono::Duration::microseconds(1);
        assert_eq!(to_db_string(&later), "2024-05-01T12:00:00.000001Z");
        assert!(to_db_string(&later) > to_db_string(&whole));
    }
}
