//! In-process `HitCache` backed by a concurrent map.
//!
//! Suitable for tests and single-process hosts. Multi-process deployments
//! need a shared cache (the trait is Redis-shaped for that reason); the
//! atomicity contract is the same either way.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{CacheError, CacheKey, HitCache};

#[derive(Debug, Clone, Copy)]
struct Slot {
    value: u64,
    expires_at: Instant,
}

impl Slot {
    fn live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// TTL counter cache. Expiry is lazy: a dead slot is replaced on the next
/// write or dropped on the next read.
#[derive(Default)]
pub struct MemoryCache {
    slots: DashMap<String, Slot>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entry count, for tests and introspection.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots.iter().filter(|s| s.value().live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HitCache for MemoryCache {
    fn increment(&self, key: &CacheKey, by: u64, create_ttl: Duration) -> Result<u64, CacheError> {
        let now = Instant::now();
        // The entry guard holds the shard lock, so the add is atomic with
        // respect to concurrent increments of the same key.
        let value = match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if slot.live(now) {
                    slot.value = slot.value.saturating_add(by);
                } else {
                    *slot = Slot {
                        value: by,
                        expires_at: now + create_ttl,
                    };
                }
                slot.value
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot {
                    value: by,
                    expires_at: now + create_ttl,
                });
                by
            }
        };
        Ok(value)
    }

    fn get(&self, key: &CacheKey) -> Result<Option<u64>, CacheError> {
        let rendered = key.to_string();
        let now = Instant::now();

        if let Some(slot) = self.slots.get(&rendered) {
            if slot.live(now) {
                return Ok(Some(slot.value));
            }
        } else {
            return Ok(None);
        }

        self.slots.remove_if(&rendered, |_, slot| !slot.live(now));
        Ok(None)
    }

    fn set(&self, key: &CacheKey, value: u64, ttl: Duration) -> Result<(), CacheError> {
        self.slots.insert(
            key.to_string(),
            Slot {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
