//! Tenant isolation at the HTTP edge.
//!
//! Data flows one way: the [`resolver`] binds each request to at most
//! one tenant and writes its id into [`TENANT_HEADER`]; the [`guard`]
//! turns that header into a [`VerifiedTenant`] for handlers. Nothing
//! outside this module can construct a `VerifiedTenant`.

pub mod guard;
pub mod layer;
pub mod resolver;

use std::fmt;

use axum::http::HeaderName;
use uuid::Uuid;

pub use guard::require_tenant;
pub use layer::{TenantResolverLayer, TenantResolverService};
pub use resolver::{ResolverConfig, Resolution, TenantResolver};

/// Reserved header carrying the verified tenant id on forwarded
/// requests. Any client-supplied value is discarded at the edge.
pub const TENANT_HEADER: HeaderName = HeaderName::from_static("x-tenant-id");

/// Tenant id established by the resolver for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedTenant {
    id: Uuid,
}

impl VerifiedTenant {
    fn from_trusted(id: Uuid) -> Self {
        Self { id }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for VerifiedTenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}
