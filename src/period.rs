//! Billing period derivation.
//!
//! A period is the half-open interval between two consecutive month starts in
//! the effective zone. It is derived on demand and never stored; the cache
//! key carries the period start so entries from different periods cannot
//! collide.

use std::time::Duration;

use chrono::{DateTime, Datelike, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;

/// `[start, end)` for the calendar month containing some instant, with both
/// bounds resolved to UTC instants via the effective zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QuotaPeriod {
    /// Period containing `at`, computed in `tz`.
    pub fn containing(at: DateTime<Utc>, tz: Tz) -> Self {
        let local = at.with_timezone(&tz);
        let (year, month) = (local.year(), local.month());
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };

        Self {
            start: month_start(tz, year, month),
            end: month_start(tz, next_year, next_month),
        }
    }

    /// Inclusive lower bound, exclusive upper bound. A hit landing exactly on
    /// `start` belongs to this period, never the previous one.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t < self.end
    }

    /// Time left until the period rolls over, measured from `at`. This is the
    /// only TTL the cache is ever given: an entry must die exactly at the
    /// boundary, not a flat month after creation.
    pub fn remaining(&self, at: DateTime<Utc>) -> Duration {
        (self.end - at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// First instant of the given month in `tz`, as a UTC instant.
///
/// Local midnight can be skipped or doubled by a DST transition; either way
/// the earliest valid instant of the day is the month start.
fn month_start(tz: Tz, year: i32, month: u32) -> DateTime<Utc> {
    for hour in 0..=3 {
        match tz.with_ymd_and_hms(year, month, 1, hour, 0, 0) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => continue,
        }
    }
    // No zone in the tz database skips more than a few hours at once.
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("utc has no transitions")
}
