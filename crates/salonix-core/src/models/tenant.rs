//! Tenant domain model.
//!
//! A tenant is one salon. Every other entity is scoped to a tenant, and
//! the tenant's subdomain is the routing key for all of its traffic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SalonError, SalonResult};

/// Maximum length of a DNS label.
const MAX_LABEL_LEN: usize = 63;

/// A salon registered on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Hostname label (e.g. `glamour` in `glamour.app.example`).
    ///
    /// Globally unique and immutable once issued: it is embedded in
    /// session tokens and in generated login links.
    pub subdomain: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub subdomain: String,
}

/// Fields that can be updated on an existing tenant.
///
/// Subdomains are immutable once issued; there is no `subdomain` field.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
}

/// Check that `label` can be used as a tenant subdomain.
///
/// Accepts lowercase ASCII letters, digits and inner hyphens, 1 to 63
/// characters long.
pub fn validate_subdomain(label: &str) -> SalonResult<()> {
    let invalid = |why: &str| SalonError::Validation {
        message: format!("invalid subdomain '{label}': {why}"),
    };

    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(invalid("length must be 1-63"));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(invalid("must not start or end with '-'"));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(invalid("only a-z, 0-9 and '-' are allowed"));
    }
    Ok(())
}
