use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::cache::{CacheKey, HitCache};
use crate::config::QuotaConfig;
use crate::period::QuotaPeriod;
use crate::storage::HitStore;

use super::error::QuotaError;
use super::usage::{PeriodUsage, RecordedHit};

/// Per-user monthly hit counter over an injected store and cache.
///
/// The store is ground truth; the cache holds one aggregate per
/// `(user, period)` with a TTL that dies exactly at the period boundary.
/// Clone is cheap and shares the collaborators.
#[derive(Clone)]
pub struct QuotaCounter {
    store: Arc<dyn HitStore>,
    cache: Arc<dyn HitCache>,
    config: QuotaConfig,
}

impl QuotaCounter {
    pub fn new(store: Arc<dyn HitStore>, cache: Arc<dyn HitCache>, config: QuotaConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Record a hit now. See [`record_hit_at`](Self::record_hit_at).
    pub fn record_hit(&self, user_id: &str, tz: Tz) -> Result<RecordedHit, QuotaError> {
        self.record_hit_at(user_id, tz, Utc::now())
    }

    /// Durably record a hit, then advance the cached aggregate for the
    /// period containing `timestamp`.
    ///
    /// The durable write goes first: if it fails the cache is untouched and
    /// the caller gets `RecordFailure`, so the aggregate can never run ahead
    /// of ground truth. The increment is a single atomic add at the cache
    /// layer; concurrent hits for the same user lose nothing.
    ///
    /// Period membership is decided by the hit's own timestamp, not this
    /// process's clock, so a slightly skewed writer still lands the hit in
    /// the right slot.
    pub fn record_hit_at(
        &self,
        user_id: &str,
        tz: Tz,
        timestamp: DateTime<Utc>,
    ) -> Result<RecordedHit, QuotaError> {
        if user_id.trim().is_empty() {
            return Err(QuotaError::EmptyUserId);
        }

        self.store
            .append_hit(user_id, timestamp)
            .map_err(|source| QuotaError::RecordFailure {
                user_id: user_id.to_string(),
                source,
            })?;

        let period = QuotaPeriod::containing(timestamp, tz);
        let key = CacheKey::new(user_id, period.start);

        let cached_count = match self.cache.increment(&key, 1, period.remaining(timestamp)) {
            Ok(count) => {
                debug!(user_id, %key, count, "recorded hit");
                Some(count)
            }
            Err(err) => {
                // The hit is durable; the aggregate is now behind until the
                // next recount. Surfaced to the caller via cached_count.
                warn!(user_id, %key, error = %err, "hit recorded but cache increment failed");
                None
            }
        };

        Ok(RecordedHit {
            user_id: user_id.to_string(),
            timestamp,
            period_start: period.start,
            cached_count,
        })
    }

    /// Count hits in the current period. See
    /// [`count_hits_at`](Self::count_hits_at).
    pub fn count_hits(&self, user_id: &str, tz: Tz) -> Result<PeriodUsage, QuotaError> {
        self.count_hits_at(user_id, tz, Utc::now())
    }

    /// Count hits in the period containing `now`, computed in `tz`.
    ///
    /// The cache key carries the period start, so a count populated under
    /// last month's boundary can never answer for this month, whatever its
    /// TTL. On a miss the store is recounted over the period and the cache
    /// repopulated with a TTL equal to the time left until the boundary.
    /// Concurrent misses may recount redundantly; they converge on the same
    /// value. If the cache is unreachable the store answers directly.
    pub fn count_hits_at(
        &self,
        user_id: &str,
        tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<PeriodUsage, QuotaError> {
        if user_id.trim().is_empty() {
            return Err(QuotaError::EmptyUserId);
        }

        let period = QuotaPeriod::containing(now, tz);
        let key = CacheKey::new(user_id, period.start);

        match self.cache.get(&key) {
            Ok(Some(hits)) => {
                debug!(user_id, %key, hits, "served count from cache");
                Ok(self.usage(user_id, period, hits, true))
            }
            Ok(None) => {
                let hits = self.recount(user_id, period)?;
                self.populate(&key, hits, period.remaining(now));
                Ok(self.usage(user_id, period, hits, false))
            }
            Err(err) => {
                warn!(user_id, %key, error = %err, "cache unavailable, counting from store");
                let hits = self.recount(user_id, period)?;
                Ok(self.usage(user_id, period, hits, false))
            }
        }
    }

    fn recount(&self, user_id: &str, period: QuotaPeriod) -> Result<u64, QuotaError> {
        let until = self.config.bound_future_hits.then_some(period.end);
        Ok(self.store.count_hits(user_id, period.start, until)?)
    }

    /// Best-effort cache population after a miss. Population is idempotent
    /// and read-only with respect to ground truth, so it may be retried;
    /// giving up costs a recount on the next call, never correctness.
    fn populate(&self, key: &CacheKey, hits: u64, ttl: std::time::Duration) {
        let attempts = 1 + self.config.cache_populate_retries;
        for attempt in 1..=attempts {
            match self.cache.set(key, hits, ttl) {
                Ok(()) => {
                    debug!(%key, hits, ttl_secs = ttl.as_secs(), "populated cache");
                    return;
                }
                Err(err) if attempt < attempts => {
                    debug!(%key, attempt, error = %err, "cache population retry");
                }
                Err(err) => {
                    warn!(%key, error = %err, "cache population failed");
                }
            }
        }
    }

    fn usage(&self, user_id: &str, period: QuotaPeriod, hits: u64, cached: bool) -> PeriodUsage {
        PeriodUsage {
            user_id: user_id.to_string(),
            period_start: period.start,
            period_end: period.end,
            hits,
            cached,
        }
    }
}
