//! Aggregate-count cache contract.
//!
//! The cache is an injected collaborator, never a process-wide singleton, so
//! counters in tests (or per-tenant deployments) can use isolated instances.
//! Entries are advisory: absent or expired means "recount from the store".

pub mod memory;

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

pub use memory::MemoryCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Canonical cache key for a user's aggregate in one period.
///
/// There is exactly one rendering of the key, produced here, so the record
/// path and the count path can never address disjoint entries. The period
/// start is part of the key: a count computed under October's boundary can
/// never be served for a November lookup, whatever its TTL says.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    user_id: String,
    period_start: DateTime<Utc>,
}

impl CacheKey {
    pub fn new(user_id: &str, period_start: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            period_start,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn period_start(&self) -> DateTime<Utc> {
        self.period_start
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user/{}/hits/{}",
            self.user_id,
            self.period_start.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Shared counter cache with TTL expiry.
///
/// Implementations must make `increment` a single atomic add across
/// concurrent callers; a get-then-set pair loses updates under contention and
/// is forbidden by this contract. TTL expiry is observable only as `None`
/// from a later `get`.
pub trait HitCache: Send + Sync {
    /// Atomically add `by` to the entry, creating it with value `by` and
    /// `create_ttl` when absent or expired. The TTL of a live entry is not
    /// extended. Returns the post-increment value.
    fn increment(&self, key: &CacheKey, by: u64, create_ttl: Duration) -> Result<u64, CacheError>;

    fn get(&self, key: &CacheKey) -> Result<Option<u64>, CacheError>;

    /// Unconditionally store `value` with `ttl`. Concurrent setters for the
    /// same key converge on the same authoritative count, so last-write-wins
    /// is acceptable here.
    fn set(&self, key: &CacheKey, value: u64, ttl: Duration) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn key_rendering_is_canonical() {
        let start = Utc.with_ymd_and_hms(2022, 10, 31, 13, 0, 0).unwrap();
        let key = CacheKey::new("42", start);
        assert_eq!(key.to_string(), "user/42/hits/2022-10-31T13:00:00Z");
    }

    #[test]
    fn keys_for_different_periods_differ() {
        let october = Utc.with_ymd_and_hms(2022, 10, 1, 0, 0, 0).unwrap();
        let november = Utc.with_ymd_and_hms(2022, 11, 1, 0, 0, 0).unwrap();
        assert_ne!(CacheKey::new("42", october), CacheKey::new("42", november));
    }
}
