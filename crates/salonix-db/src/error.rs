//! Database-specific error types and conversions.

use salonix_core::error::SalonError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    Conflict { entity: String },

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl DbError {
    /// Classify a failed statement. Unique-index violations become
    /// [`DbError::Conflict`].
    pub(crate) fn from_statement(entity: &str, err: impl std::fmt::Display) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") || msg.contains("already exists") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Migration(msg)
        }
    }
}

impl From<DbError> for SalonError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => SalonError::NotFound { entity, id },
            DbError::Conflict { entity } => SalonError::AlreadyExists { entity },
            other => SalonError::Database(other.to_string()),
        }
    }
}
