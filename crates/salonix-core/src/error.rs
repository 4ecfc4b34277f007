//! Error types for the Salonix system.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SalonError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Tenant context missing or invalid")]
    TenantContext,

    #[error("Ledger is closed for {date}")]
    DateLocked { date: NaiveDate },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SalonResult<T> = Result<T, SalonError>;
