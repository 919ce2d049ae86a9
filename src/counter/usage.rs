use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a count: how many hits the user has in the current period, and
/// where the number came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodUsage {
    pub user_id: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub hits: u64,
    /// True when served from the cache, false when recounted from the store
    /// (miss or degraded path).
    pub cached: bool,
}

impl PeriodUsage {
    pub fn exceeds(&self, limit: u64) -> bool {
        limit > 0 && self.hits >= limit
    }

    pub fn remaining(&self, limit: u64) -> u64 {
        limit.saturating_sub(self.hits)
    }
}

/// Outcome of a successful `record_hit`: the hit is durable; `cached_count`
/// is the post-increment aggregate, or `None` when the cache was unreachable
/// and the aggregate could not be advanced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedHit {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub cached_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn usage(hits: u64) -> PeriodUsage {
        PeriodUsage {
            user_id: "u1".into(),
            period_start: Utc.with_ymd_and_hms(2022, 11, 1, 0, 0, 0).unwrap(),
            period_end: Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).unwrap(),
            hits,
            cached: true,
        }
    }

    #[test]
    fn exceeds_at_limit_not_below() {
        assert!(!usage(4).exceeds(5));
        assert!(usage(5).exceeds(5));
        assert!(usage(6).exceeds(5));
    }

    #[test]
    fn zero_limit_means_unlimited() {
        assert!(!usage(1_000_000).exceeds(0));
    }

    #[test]
    fn remaining_saturates() {
        assert_eq!(usage(3).remaining(5), 2);
        assert_eq!(usage(9).remaining(5), 0);
    }
}
