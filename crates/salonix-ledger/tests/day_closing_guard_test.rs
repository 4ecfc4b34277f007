//! Tests for the day-closing guard against an in-memory repository.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use salonix_core::error::{SalonError, SalonResult};
use salonix_core::models::day_closing::{ClosingStatus, CreateDayClosing, DayClosing};
use salonix_core::repository::DayClosingRepository;
use salonix_ledger::{CachedClosing, ClosingCache, DayClosingGuard, InMemoryClosingCache};
use tokio::sync::Notify;
use uuid::Uuid;

#[derive(Default)]
struct MemClosings {
    rows: Mutex<Vec<DayClosing>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
    fail_next_finalize: AtomicBool,
    /// When set, the next lookup takes its snapshot, signals
    /// `lookup_started`, then waits for `release_lookup` before returning.
    hold_lookup: AtomicBool,
    lookup_started: Notify,
    release_lookup: Notify,
}

impl MemClosings {
    /// Finalize a closing directly in the store, bypassing the guard.
    fn insert_completed(&self, tenant_id: Uuid, date: NaiveDate) {
        self.rows.lock().unwrap().push(DayClosing {
            id: Uuid::new_v4(),
            tenant_id,
            closing_date: date,
            status: ClosingStatus::Completed,
            closed_by: None,
            created_at: Utc::now(),
            finalized_at: Some(Utc::now()),
        });
    }
}

impl DayClosingRepository for MemClosings {
    async fn create(&self, input: CreateDayClosing) -> SalonResult<DayClosing> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.tenant_id == input.tenant_id && r.closing_date == input.closing_date)
        {
            return Err(SalonError::AlreadyExists {
                entity: "day_closing".into(),
            });
        }
        let closing = DayClosing {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            closing_date: input.closing_date,
            status: ClosingStatus::Pending,
            closed_by: None,
            created_at: Utc::now(),
            finalized_at: None,
        };
        rows.push(closing.clone());
        Ok(closing)
    }

    async fn get_by_date(
        &self,
        tenant_id: Uuid,
        closing_date: NaiveDate,
    ) -> SalonResult<Option<DayClosing>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.tenant_id == tenant_id && r.closing_date == closing_date)
            .cloned())
    }

    async fn finalize(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        closed_by: Option<Uuid>,
    ) -> SalonResult<DayClosing> {
        if self.fail_next_finalize.swap(false, Ordering::SeqCst) {
            return Err(SalonError::Database("store unavailable".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.tenant_id == tenant_id && r.id == id)
            .ok_or_else(|| SalonError::NotFound {
                entity: "day_closing".into(),
                id: id.to_string(),
            })?;
        row.status = ClosingStatus::Completed;
        row.closed_by = closed_by;
        row.finalized_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn latest_completed_date(&self, tenant_id: Uuid) -> SalonResult<Option<NaiveDate>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SalonError::Database("store unavailable".into()));
        }
        let latest = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.status == ClosingStatus::Completed)
            .map(|r| r.closing_date)
            .max();
        if self.hold_lookup.swap(false, Ordering::SeqCst) {
            self.lookup_started.notify_one();
            self.release_lookup.notified().await;
        }
        Ok(latest)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn nothing_is_locked_before_any_closing() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let tenant = Uuid::new_v4();

    for d in [date(2000, 1, 1), date(2025, 6, 10), date(2099, 12, 31)] {
        assert!(!guard.is_date_locked(tenant, d).await.unwrap());
    }
}

#[tokio::test]
async fn closing_locks_on_and_before_its_date() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let t1 = Uuid::new_v4();

    // Prime the cache with "never closed".
    assert!(!guard.is_date_locked(t1, date(2025, 6, 5)).await.unwrap());

    guard.close_day(t1, date(2025, 6, 10), None).await.unwrap();

    assert!(guard.is_date_locked(t1, date(2025, 6, 5)).await.unwrap());
    assert!(guard.is_date_locked(t1, date(2025, 6, 10)).await.unwrap());
    assert!(!guard.is_date_locked(t1, date(2025, 6, 11)).await.unwrap());
}

#[tokio::test]
async fn mutation_on_closed_date_is_refused() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let t1 = Uuid::new_v4();
    guard.close_day(t1, date(2025, 6, 10), None).await.unwrap();

    let refused = guard.ensure_unlocked(t1, date(2025, 6, 5)).await;
    assert!(matches!(refused, Err(SalonError::DateLocked { date: d }) if d == date(2025, 6, 5)));

    assert!(guard.ensure_unlocked(t1, date(2025, 6, 11)).await.is_ok());
}

#[tokio::test]
async fn closings_do_not_leak_across_tenants() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let (t1, t2) = (Uuid::new_v4(), Uuid::new_v4());
    guard.close_day(t1, date(2025, 6, 10), None).await.unwrap();

    assert!(guard.is_date_locked(t1, date(2025, 6, 1)).await.unwrap());
    assert!(!guard.is_date_locked(t2, date(2025, 6, 1)).await.unwrap());
}

#[tokio::test]
async fn answers_are_served_from_cache() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let tenant = Uuid::new_v4();

    guard.is_date_locked(tenant, date(2025, 6, 1)).await.unwrap();
    guard.is_date_locked(tenant, date(2025, 6, 2)).await.unwrap();
    guard.is_date_locked(tenant, date(2025, 6, 3)).await.unwrap();

    assert_eq!(guard.repository().lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn external_finalize_is_stale_until_invalidated() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let tenant = Uuid::new_v4();

    assert!(!guard.is_date_locked(tenant, date(2025, 6, 5)).await.unwrap());

    guard
        .repository()
        .insert_completed(tenant, date(2025, 6, 10));
    // The cache still holds "never closed".
    assert!(!guard.is_date_locked(tenant, date(2025, 6, 5)).await.unwrap());

    guard.invalidate(tenant);
    assert!(guard.is_date_locked(tenant, date(2025, 6, 5)).await.unwrap());
}

#[tokio::test]
async fn lookup_failure_is_not_reported_as_unlocked() {
    let repo = MemClosings::default();
    repo.unavailable.store(true, Ordering::SeqCst);
    let guard = DayClosingGuard::in_memory(repo);
    let tenant = Uuid::new_v4();

    assert!(guard.is_date_locked(tenant, date(2025, 6, 5)).await.is_err());
    assert!(guard.ensure_unlocked(tenant, date(2025, 6, 5)).await.is_err());

    // A failed lookup must not be cached as "never closed".
    guard.repository().unavailable.store(false, Ordering::SeqCst);
    guard
        .repository()
        .insert_completed(tenant, date(2025, 6, 10));
    assert!(guard.is_date_locked(tenant, date(2025, 6, 5)).await.unwrap());
}

#[tokio::test]
async fn timestamp_is_compared_by_local_calendar_day() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let tenant = Uuid::new_v4();
    guard.close_day(tenant, date(2025, 6, 10), None).await.unwrap();

    let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
    let late_on_closed_day = ist.with_ymd_and_hms(2025, 6, 10, 23, 59, 59).unwrap();
    let next_morning = ist.with_ymd_and_hms(2025, 6, 11, 0, 0, 1).unwrap();

    assert!(guard.is_timestamp_locked(tenant, &late_on_closed_day).await.unwrap());
    assert!(!guard.is_timestamp_locked(tenant, &next_morning).await.unwrap());
}

#[tokio::test]
async fn injected_cache_sees_invalidation() {
    let guard = DayClosingGuard::new(MemClosings::default(), InMemoryClosingCache::new());
    let tenant = Uuid::new_v4();

    guard.is_date_locked(tenant, date(2025, 6, 1)).await.unwrap();
    let closing = guard
        .repository()
        .create(CreateDayClosing {
            tenant_id: tenant,
            closing_date: date(2025, 6, 10),
        })
        .await
        .unwrap();
    guard
        .finalize_closing(tenant, closing.id, Some(Uuid::new_v4()))
        .await
        .unwrap();

    assert!(guard.is_date_locked(tenant, date(2025, 6, 10)).await.unwrap());
    assert_eq!(guard.repository().lookups.load(Ordering::SeqCst), 2);
}

#[test]
fn cache_trait_object_is_usable() {
    let cache: Box<dyn ClosingCache> = Box::new(InMemoryClosingCache::new());
    let tenant = Uuid::new_v4();
    assert!(cache.put(tenant, 0, CachedClosing::ClosedThrough(date(2025, 6, 10))));
    assert_eq!(
        cache.get(tenant),
        Some(CachedClosing::ClosedThrough(date(2025, 6, 10)))
    );
}

#[tokio::test]
async fn lookup_overlapping_a_finalize_is_not_cached() {
    let guard = Arc::new(DayClosingGuard::in_memory(MemClosings::default()));
    let tenant = Uuid::new_v4();
    guard.repository().hold_lookup.store(true, Ordering::SeqCst);

    let reader = tokio::spawn({
        let guard = Arc::clone(&guard);
        async move { guard.is_date_locked(tenant, date(2025, 6, 5)).await }
    });
    guard.repository().lookup_started.notified().await;

    // The reader holds a "never closed" snapshot while the day is closed.
    guard.close_day(tenant, date(2025, 6, 10), None).await.unwrap();
    guard.repository().release_lookup.notify_one();

    // The overlapping read may still answer from its old snapshot...
    assert!(!reader.await.unwrap().unwrap());
    // ...but it must not have been cached over the invalidation.
    assert!(guard.is_date_locked(tenant, date(2025, 6, 5)).await.unwrap());
    assert_eq!(guard.repository().lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn close_day_retries_after_failed_finalize() {
    let guard = DayClosingGuard::in_memory(MemClosings::default());
    let tenant = Uuid::new_v4();
    guard.repository().fail_next_finalize.store(true, Ordering::SeqCst);

    let first = guard.close_day(tenant, date(2025, 6, 10), None).await;
    assert!(matches!(first, Err(SalonError::Database(_))));
    assert!(!guard.is_date_locked(tenant, date(2025, 6, 5)).await.unwrap());

    let closed_by = Uuid::new_v4();
    let retried = guard
        .close_day(tenant, date(2025, 6, 10), Some(closed_by))
        .await
        .unwrap();
    assert_eq!(retried.status, ClosingStatus::Completed);
    assert_eq!(retried.closed_by, Some(closed_by));
    assert_eq!(guard.repository().rows.lock().unwrap().len(), 1);
    assert!(guard.is_date_locked(tenant, date(2025, 6, 5)).await.unwrap());

    let again = guard.close_day(tenant, date(2025, 6, 10), None).await;
    assert!(matches!(again, Err(SalonError::AlreadyExists { .. })));
}
