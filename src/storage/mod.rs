//! Durable hit log.
//!
//! The store is the ground truth: the cache only ever holds a recomputation
//! of what is appended here. Hits are immutable once written; retention is a
//! host concern.

pub mod database;
pub mod error;
pub mod schema;

use chrono::{DateTime, Utc};

pub use database::SqliteHitStore;
pub use error::StorageError;

pub const HITS_DB_FILENAME: &str = "hits.db";

/// Append-only datastore contract consumed by the counter.
pub trait HitStore: Send + Sync {
    /// Durably record one hit for the user at the given instant.
    fn append_hit(&self, user_id: &str, timestamp: DateTime<Utc>) -> Result<(), StorageError>;

    /// Count hits in `[since, until)`; `until = None` leaves the range
    /// unbounded above. Half-open on both ends of the contract: a hit at
    /// exactly `since` counts, a hit at exactly `until` does not.
    fn count_hits(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> Result<u64, StorageError>;
}
