//! Day-closing guard.
//!
//! Answers "is this date's ledger closed for this tenant?". The guard is
//! advisory: refusing the mutation is the caller's job, and a failed
//! lookup must be treated as locked.

use chrono::{DateTime, NaiveDate, TimeZone};
use salonix_core::error::{SalonError, SalonResult};
use salonix_core::models::day_closing::{ClosingStatus, CreateDayClosing, DayClosing};
use salonix_core::repository::DayClosingRepository;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{CachedClosing, ClosingCache, InMemoryClosingCache};

/// Read-through cache over [`DayClosingRepository::latest_completed_date`].
///
/// Every path that finalizes a closing must end in [`invalidate`]
/// (`finalize_closing` and `close_day` do), otherwise the tenant keeps
/// getting a stale "unlocked" answer.
///
/// [`invalidate`]: DayClosingGuard::invalidate
pub struct DayClosingGuard<R: DayClosingRepository, C: ClosingCache = InMemoryClosingCache> {
    repo: R,
    cache: C,
}

impl<R: DayClosingRepository> DayClosingGuard<R> {
    pub fn in_memory(repo: R) -> Self {
        Self::new(repo, InMemoryClosingCache::new())
    }
}

impl<R: DayClosingRepository, C: ClosingCache> DayClosingGuard<R, C> {
    pub fn new(repo: R, cache: C) -> Self {
        Self { repo, cache }
    }

    /// Whether `date` is on or before the tenant's latest closed date.
    ///
    /// Store errors are returned as-is, never mapped to "unlocked".
    pub async fn is_date_locked(&self, tenant_id: Uuid, date: NaiveDate) -> SalonResult<bool> {
        Ok(self.latest(tenant_id).await?.locks(date))
    }

    /// Same as [`is_date_locked`](Self::is_date_locked) for a timestamp;
    /// the calendar date is taken in the timestamp's own offset.
    pub fn is_timestamp_locked<Tz: TimeZone>(
        &self,
        tenant_id: Uuid,
        at: &DateTime<Tz>,
    ) -> impl Future<Output = SalonResult<bool>> + '_ {
        self.is_date_locked(tenant_id, at.date_naive())
    }

    /// `Ok(())` if financial records dated `date` may be written,
    /// [`SalonError::DateLocked`] if the date is closed.
    pub async fn ensure_unlocked(&self, tenant_id: Uuid, date: NaiveDate) -> SalonResult<()> {
        if self.is_date_locked(tenant_id, date).await? {
            debug!(tenant_id = %tenant_id, %date, "ledger date is closed");
            return Err(SalonError::DateLocked { date });
        }
        Ok(())
    }

    /// Finalize a pending closing and evict the tenant's cache entry.
    pub async fn finalize_closing(
        &self,
        tenant_id: Uuid,
        closing_id: Uuid,
        closed_by: Option<Uuid>,
    ) -> SalonResult<DayClosing> {
        let closing = self.repo.finalize(tenant_id, closing_id, closed_by).await?;
        self.invalidate(tenant_id);
        info!(
            tenant_id = %tenant_id,
            closing_date = %closing.closing_date,
            "Day closing finalized"
        );
        Ok(closing)
    }

    /// Record and immediately finalize a closing for `date`.
    ///
    /// A pending closing left behind by an earlier failed finalize is
    /// picked up and finalized; a completed one is `AlreadyExists`.
    pub async fn close_day(
        &self,
        tenant_id: Uuid,
        date: NaiveDate,
        closed_by: Option<Uuid>,
    ) -> SalonResult<DayClosing> {
        let pending = match self.repo.get_by_date(tenant_id, date).await? {
            Some(existing) if existing.status == ClosingStatus::Completed => {
                return Err(SalonError::AlreadyExists {
                    entity: "day_closing".into(),
                });
            }
            Some(existing) => {
                debug!(tenant_id = %tenant_id, %date, "Resuming pending day closing");
                existing
            }
            None => {
                self.repo
                    .create(CreateDayClosing {
                        tenant_id,
                        closing_date: date,
                    })
                    .await?
            }
        };
        self.finalize_closing(tenant_id, pending.id, closed_by).await
    }

    /// Drop the cached answer for `tenant_id`. Call this whenever a
    /// closing is finalized outside [`finalize_closing`](Self::finalize_closing).
    pub fn invalidate(&self, tenant_id: Uuid) {
        self.cache.invalidate(tenant_id);
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    async fn latest(&self, tenant_id: Uuid) -> SalonResult<CachedClosing> {
        if let Some(entry) = self.cache.get(tenant_id) {
            return Ok(entry);
        }

        // Taken before the read so a concurrent invalidate wins.
        let generation = self.cache.generation(tenant_id);
        let entry = CachedClosing::from_latest(self.repo.latest_completed_date(tenant_id).await?);
        if self.cache.put(tenant_id, generation, entry) {
            debug!(tenant_id = %tenant_id, ?entry, "Cached latest closing");
        } else {
            debug!(tenant_id = %tenant_id, "Closing invalidated during lookup; not cached");
        }
        Ok(entry)
    }
}
