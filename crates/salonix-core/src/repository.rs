//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::SalonResult;
use crate::models::{
    customer::{CreateCustomer, CustomerRecord},
    day_closing::{CreateDayClosing, DayClosing},
    tenant::{CreateTenant, Tenant, UpdateTenant},
};

// ---------------------------------------------------------------------------
// Tenant (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = SalonResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = SalonResult<Tenant>> + Send;
    fn get_by_subdomain(
        &self,
        subdomain: &str,
    ) -> impl Future<Output = SalonResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = SalonResult<Tenant>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait CustomerRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCustomer,
    ) -> impl Future<Output = SalonResult<CustomerRecord>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = SalonResult<CustomerRecord>> + Send;
    /// Equality lookup of one blind-index token against the stored
    /// phone token sets.
    fn search_by_phone_token(
        &self,
        tenant_id: Uuid,
        token: &str,
        limit: u64,
    ) -> impl Future<Output = SalonResult<Vec<CustomerRecord>>> + Send;
}

pub trait DayClosingRepository: Send + Sync {
    /// Record a pending closing. At most one closing exists per
    /// (tenant, date).
    fn create(
        &self,
        input: CreateDayClosing,
    ) -> impl Future<Output = SalonResult<DayClosing>> + Send;
    /// Closing recorded for `closing_date`, whatever its status.
    fn get_by_date(
        &self,
        tenant_id: Uuid,
        closing_date: NaiveDate,
    ) -> impl Future<Output = SalonResult<Option<DayClosing>>> + Send;
    /// Mark a pending closing completed.
    fn finalize(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        closed_by: Option<Uuid>,
    ) -> impl Future<Output = SalonResult<DayClosing>> + Send;
    /// Most recent completed closing date, or `None` if the tenant has
    /// never closed a day.
    fn latest_completed_date(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = SalonResult<Option<NaiveDate>>> + Send;
}
