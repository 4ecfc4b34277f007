//! Tenant-scoped data access guard.
//!
//! Handlers that touch tenant data take a [`VerifiedTenant`] argument;
//! the request is rejected before the handler runs when the resolver
//! did not attach a tenant.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::{TENANT_HEADER, VerifiedTenant};
use crate::error::ApiError;

/// Read the verified tenant id set by the resolver.
///
/// Fails when the header is absent, empty, or not a UUID. Never falls
/// back to a default tenant.
pub fn require_tenant(headers: &HeaderMap) -> Result<VerifiedTenant, ApiError> {
    let raw = headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let Some(raw) = raw else {
        warn!("Tenant-scoped request arrived without a tenant context");
        return Err(ApiError::MissingTenant);
    };

    Uuid::parse_str(raw).map(VerifiedTenant::from_trusted).map_err(|_| {
        warn!("Tenant-scoped request carried a malformed tenant id");
        ApiError::MissingTenant
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_tenant(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn valid_header_yields_tenant() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(require_tenant(&headers).unwrap().id(), id);
    }

    #[test]
    fn missing_empty_or_malformed_header_is_rejected() {
        assert!(matches!(require_tenant(&HeaderMap::new()), Err(ApiError::MissingTenant)));

        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_static(""));
        assert!(require_tenant(&headers).is_err());

        headers.insert(TENANT_HEADER, HeaderValue::from_static("default"));
        assert!(require_tenant(&headers).is_err());
    }
}
