//! Salonix Server — the tenant-resolving HTTP edge and REST API.
//!
//! Request flow: trace span → tenant resolver (allow / redirect /
//! reject, page rewrite) → router → handlers guarded by
//! [`tenancy::VerifiedTenant`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod tenancy;

use axum::Router;
use tower::Layer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::tenancy::{TenantResolver, TenantResolverLayer};

/// Build the full application.
///
/// The resolver wraps the inner router as a service so its path rewrite
/// is visible to routing; the outer router only adds tracing.
pub fn app(state: AppState, resolver: TenantResolver) -> Router {
    let resolved = TenantResolverLayer::new(resolver).layer(routes::router(state));
    Router::new()
        .fallback_service(resolved)
        .layer(TraceLayer::new_for_http())
}
