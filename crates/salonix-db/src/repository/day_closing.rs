//! SurrealDB implementation of [`DayClosingRepository`].

use chrono::{DateTime, NaiveDate, Utc};
use salonix_core::error::SalonResult;
use salonix_core::models::day_closing::{ClosingStatus, CreateDayClosing, DayClosing};
use salonix_core::repository::DayClosingRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, SurrealValue)]
struct DayClosingRow {
    tenant_id: String,
    closing_date: String,
    status: String,
    closed_by: Option<String>,
    created_at: DateTime<Utc>,
    finalized_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct DayClosingRowWithId {
    record_id: String,
    tenant_id: String,
    closing_date: String,
    status: String,
    closed_by: Option<String>,
    created_at: DateTime<Utc>,
    finalized_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct ClosingDateRow {
    closing_date: String,
}

fn parse_status(s: &str) -> Result<ClosingStatus, DbError> {
    match s {
        "Pending" => Ok(ClosingStatus::Pending),
        "Completed" => Ok(ClosingStatus::Completed),
        other => Err(DbError::Corrupt(format!("unknown closing status: {other}"))),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DbError::Corrupt(format!("invalid closing_date '{raw}': {e}")))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl DayClosingRow {
    fn into_closing(self, id: Uuid) -> Result<DayClosing, DbError> {
        Ok(DayClosing {
            id,
            tenant_id: parse_uuid("tenant", &self.tenant_id)?,
            closing_date: parse_date(&self.closing_date)?,
            status: parse_status(&self.status)?,
            closed_by: self
                .closed_by
                .as_deref()
                .map(|raw| parse_uuid("user", raw))
                .transpose()?,
            created_at: self.created_at,
            finalized_at: self.finalized_at,
        })
    }
}

impl DayClosingRowWithId {
    fn try_into_closing(self) -> Result<DayClosing, DbError> {
        let id = parse_uuid("day_closing", &self.record_id)?;
        DayClosingRow {
            tenant_id: self.tenant_id,
            closing_date: self.closing_date,
            status: self.status,
            closed_by: self.closed_by,
            created_at: self.created_at,
            finalized_at: self.finalized_at,
        }
        .into_closing(id)
    }
}

/// SurrealDB implementation of the DayClosing repository.
#[derive(Clone)]
pub struct SurrealDayClosingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDayClosingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// All closings of a tenant, newest date first.
    pub async fn list(&self, tenant_id: Uuid) -> SalonResult<Vec<DayClosing>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM day_closing \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY closing_date DESC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DayClosingRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_closing())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}

impl<C: Connection> DayClosingRepository for SurrealDayClosingRepository<C> {
    async fn create(&self, input: CreateDayClosing) -> SalonResult<DayClosing> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('day_closing', $id) SET \
                 tenant_id = $tenant_id, \
                 closing_date = $closing_date, \
                 status = 'Pending'",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("closing_date", format_date(input.closing_date)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("day_closing", e))?;

        let rows: Vec<DayClosingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "day_closing".into(),
            id: id_str,
        })?;

        row.into_closing(id).map_err(Into::into)
    }

    async fn get_by_date(
        &self,
        tenant_id: Uuid,
        closing_date: NaiveDate,
    ) -> SalonResult<Option<DayClosing>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM day_closing \
                 WHERE tenant_id = $tenant_id AND closing_date = $closing_date \
                 LIMIT 1",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("closing_date", format_date(closing_date)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DayClosingRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(|row| row.try_into_closing())
            .transpose()
            .map_err(Into::into)
    }

    async fn finalize(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        closed_by: Option<Uuid>,
    ) -> SalonResult<DayClosing> {
        let id_str = id.to_string();

        // Only pending closings move; a completed closing never changes.
        let result = self
            .db
            .query(
                "UPDATE type::record('day_closing', $id) SET \
                 status = 'Completed', \
                 closed_by = $closed_by, \
                 finalized_at = time::now() \
                 WHERE tenant_id = $tenant_id AND status = 'Pending'",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("closed_by", closed_by.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("day_closing", e))?;

        let rows: Vec<DayClosingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "pending day_closing".into(),
            id: id_str,
        })?;

        row.into_closing(id).map_err(Into::into)
    }

    async fn latest_completed_date(&self, tenant_id: Uuid) -> SalonResult<Option<NaiveDate>> {
        let mut result = self
            .db
            .query(
                "SELECT closing_date FROM day_closing \
                 WHERE tenant_id = $tenant_id AND status = 'Completed' \
                 ORDER BY closing_date DESC \
                 LIMIT 1",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClosingDateRow> = result.take(0).map_err(DbError::from)?;
        rows.first()
            .map(|row| parse_date(&row.closing_date))
            .transpose()
            .map_err(Into::into)
    }
}
