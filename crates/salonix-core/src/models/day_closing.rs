//! Day-closing domain model.
//!
//! A completed closing freezes the tenant's financial ledger for its
//! date and every earlier date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosingStatus {
    /// Counted but not yet finalized; does not lock anything.
    Pending,
    /// Finalized; never reverts through normal operation.
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayClosing {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub closing_date: NaiveDate,
    pub status: ClosingStatus,
    /// User who finalized the closing.
    pub closed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDayClosing {
    pub tenant_id: Uuid,
    pub closing_date: NaiveDate,
}
