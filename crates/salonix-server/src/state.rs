use std::sync::Arc;

use salonix_crypto::FieldProtector;
use salonix_db::repository::{
    SurrealCustomerRepository, SurrealDayClosingRepository, SurrealTenantRepository,
};
use salonix_ledger::DayClosingGuard;
use surrealdb::{Surreal, engine::any::Any};

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub tenants: SurrealTenantRepository<Any>,
    pub customers: SurrealCustomerRepository<Any>,
    pub closings: Arc<DayClosingGuard<SurrealDayClosingRepository<Any>>>,
    pub fields: Arc<FieldProtector>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, fields: FieldProtector) -> Self {
        Self {
            tenants: SurrealTenantRepository::new(db.clone()),
            customers: SurrealCustomerRepository::new(db.clone()),
            closings: Arc::new(DayClosingGuard::in_memory(SurrealDayClosingRepository::new(db))),
            fields: Arc::new(fields),
        }
    }
}
