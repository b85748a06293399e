use crate::clock::{Clock, SystemClock};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use snip_core::store::{check_arguments, Result};
use snip_core::{MappingStore, OpContext, ShortKey, StoreError, DEFAULT_TTL};
use std::time::Duration;
use tracing::{debug, trace};

/// In-memory storage slot for a URL mapping.
#[derive(Debug, Clone)]
struct Slot {
    url: String,
    expire_at: Timestamp,
}

impl Slot {
    fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expire_at
    }
}

/// In-memory implementation of [`MappingStore`] using DashMap.
///
/// Conditional insert goes through the map's entry API and delete through a
/// single `remove`, both of which hold the shard lock for the whole step, so
/// the store gives the same race guarantees as a remote backend. Expired
/// entries are invisible and are dropped lazily when touched.
#[derive(Debug)]
pub struct InMemoryStore<C = SystemClock> {
    slots: DashMap<String, Slot>,
    ttl: SignedDuration,
    clock: C,
}

impl InMemoryStore<SystemClock> {
    /// Creates a new in-memory store with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates a new in-memory store whose entries live for `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl Default for InMemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStore<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            slots: DashMap::new(),
            ttl: SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX),
            clock,
        }
    }

    fn expiry_from(&self, now: Timestamp) -> Timestamp {
        now.checked_add(self.ttl).unwrap_or(Timestamp::MAX)
    }
}

#[async_trait]
impl<C: Clock> MappingStore for InMemoryStore<C> {
    async fn create(&self, ctx: &OpContext, key: &ShortKey, url: &str) -> Result<()> {
        check_arguments(key, Some(url))?;
        ctx.check("create")?;

        let now = self.clock.now();
        let slot = Slot {
            url: url.to_owned(),
            expire_at: self.expiry_from(now),
        };

        match self.slots.entry(key.as_str().to_owned()) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_expired(now) {
                    return Err(StoreError::KeyExists(key.to_string()));
                }
                // An expired entry no longer holds the key.
                occupied.insert(slot);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(slot);
            }
        }

        trace!(key = %key, "Created mapping in memory");
        Ok(())
    }

    async fn get(&self, ctx: &OpContext, key: &ShortKey) -> Result<String> {
        check_arguments(key, None)?;
        ctx.check("get")?;

        let now = self.clock.now();
        let Some(mut slot) = self.slots.get_mut(key.as_str()) else {
            return Err(StoreError::NotFound(key.to_string()));
        };

        if slot.is_expired(now) {
            drop(slot);
            self.slots.remove_if(key.as_str(), |_, s| s.is_expired(now));
            debug!(key = %key, "Mapping expired");
            return Err(StoreError::NotFound(key.to_string()));
        }

        slot.expire_at = self.expiry_from(now);
        Ok(slot.url.clone())
    }

    async fn delete(&self, ctx: &OpContext, key: &ShortKey) -> Result<()> {
        check_arguments(key, None)?;
        ctx.check("delete")?;

        let now = self.clock.now();
        match self.slots.remove(key.as_str()) {
            Some((_, slot)) if !slot.is_expired(now) => Ok(()),
            _ => Err(StoreError::NotFound(key.to_string())),
        }
    }

    async fn exists(&self, ctx: &OpContext, key: &ShortKey) -> Result<bool> {
        check_arguments(key, None)?;
        ctx.check("exists")?;

        let now = self.clock.now();
        Ok(self
            .slots
            .get(key.as_str())
            .is_some_and(|slot| !slot.is_expired(now)))
    }
}
