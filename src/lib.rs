//! Monthly per-user hit quota counting with timezone-correct period
//! boundaries.
//!
//! [`QuotaCounter`] answers "how many hits has this user recorded this
//! month?" cheaply via a TTL cache and correctly via a durable hit log. The
//! month is the calendar month in the user's *effective* zone (stored zone,
//! else request zone, else a configured default), and the cache is keyed by
//! `(user, period_start)` so counts from a finished period can never bleed
//! into the next one while their TTL runs out.
//!
//! The two collaborators are traits: [`storage::HitStore`] (ground truth)
//! and [`cache::HitCache`] (fast path, Redis-shaped atomic increment).
//! Reference implementations ship with the crate:
//! [`storage::SqliteHitStore`] and [`cache::MemoryCache`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono_tz::Tz;
//! use quota_counter::{
//!     cache::MemoryCache, config::QuotaConfig, counter::QuotaCounter,
//!     storage::SqliteHitStore, timezone::effective_timezone,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = Arc::new(SqliteHitStore::new("data/quota".into())?);
//! let cache = Arc::new(MemoryCache::new());
//! let counter = QuotaCounter::new(store, cache, QuotaConfig::default());
//!
//! let tz = effective_timezone(Some("Australia/Sydney"), None, Tz::UTC)?;
//! counter.record_hit("user-42", tz)?;
//! let usage = counter.count_hits("user-42", tz)?;
//! assert!(!usage.exceeds(10_000));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod counter;
pub mod period;
pub mod storage;
pub mod timezone;

pub use cache::{CacheError, CacheKey, HitCache, MemoryCache};
pub use config::QuotaConfig;
pub use counter::{PeriodUsage, QuotaCounter, QuotaError, RecordedHit};
pub use period::QuotaPeriod;
pub use storage::{HitStore, SqliteHitStore, StorageError};
pub use timezone::{effective_timezone, TimezoneError};
