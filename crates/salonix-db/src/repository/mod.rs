//! SurrealDB repository implementations.

mod customer;
mod day_closing;
mod tenant;

pub use customer::SurrealCustomerRepository;
pub use day_closing::SurrealDayClosingRepository;
pub use tenant::SurrealTenantRepository;

/// Parse a UUID stored as a string column.
pub(crate) fn parse_uuid(field: &str, raw: &str) -> Result<uuid::Uuid, crate::DbError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|e| crate::DbError::Corrupt(format!("invalid {field} UUID: {e}")))
}
