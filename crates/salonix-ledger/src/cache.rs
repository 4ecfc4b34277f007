//! Per-tenant cache of the latest closed ledger date.
//!
//! Entries never expire on their own. They are only replaced by a fresh
//! lookup or removed by [`ClosingCache::invalidate`].

use chrono::NaiveDate;
use dashmap::DashMap;
use uuid::Uuid;

/// Result of a completed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedClosing {
    /// Looked up; the tenant has no completed closing.
    NeverClosed,
    /// Looked up; every date up to and including this one is closed.
    ClosedThrough(NaiveDate),
}

impl CachedClosing {
    pub fn from_latest(latest: Option<NaiveDate>) -> Self {
        latest.map_or(Self::NeverClosed, Self::ClosedThrough)
    }

    pub fn locks(&self, date: NaiveDate) -> bool {
        match self {
            Self::NeverClosed => false,
            Self::ClosedThrough(closed) => date <= *closed,
        }
    }
}

/// Storage for [`CachedClosing`] entries keyed by tenant.
///
/// `get` returning `None` means "not looked up yet", which is distinct
/// from `Some(CachedClosing::NeverClosed)`.
///
/// Every tenant carries a generation that [`invalidate`] advances. A
/// lookup reads the generation before querying the store and hands it
/// back to [`put`]; the entry is only stored if no invalidation happened
/// in between.
///
/// [`invalidate`]: ClosingCache::invalidate
/// [`put`]: ClosingCache::put
pub trait ClosingCache: Send + Sync {
    fn get(&self, tenant_id: Uuid) -> Option<CachedClosing>;
    fn generation(&self, tenant_id: Uuid) -> u64;
    /// Store `entry` if the tenant is still at `generation`. Returns
    /// whether it was stored.
    fn put(&self, tenant_id: Uuid, generation: u64, entry: CachedClosing) -> bool;
    fn invalidate(&self, tenant_id: Uuid);
}

#[derive(Debug, Default, Clone, Copy)]
struct Slot {
    generation: u64,
    entry: Option<CachedClosing>,
}

/// Process-local cache backed by a concurrent map. Each tenant's slot
/// is compared and replaced under the map's shard lock.
#[derive(Debug, Default)]
pub struct InMemoryClosingCache {
    slots: DashMap<Uuid, Slot>,
}

impl InMemoryClosingCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClosingCache for InMemoryClosingCache {
    fn get(&self, tenant_id: Uuid) -> Option<CachedClosing> {
        self.slots.get(&tenant_id).and_then(|slot| slot.entry)
    }

    fn generation(&self, tenant_id: Uuid) -> u64 {
        self.slots.get(&tenant_id).map_or(0, |slot| slot.generation)
    }

    fn put(&self, tenant_id: Uuid, generation: u64, entry: CachedClosing) -> bool {
        let mut slot = self.slots.entry(tenant_id).or_default();
        if slot.generation != generation {
            return false;
        }
        slot.entry = Some(entry);
        true
    }

    fn invalidate(&self, tenant_id: Uuid) {
        let mut slot = self.slots.entry(tenant_id).or_default();
        slot.generation += 1;
        slot.entry = None;
    }
}
