//! HTTP error mapping and startup failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use salonix_core::error::SalonError;
use salonix_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Tenant context missing or invalid")]
    MissingTenant,

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Ledger status unavailable")]
    LedgerUnavailable,

    #[error(transparent)]
    Domain(#[from] SalonError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingTenant => (StatusCode::BAD_REQUEST, "tenant_context"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::LedgerUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "ledger_unavailable"),
            ApiError::Domain(e) => match e {
                SalonError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                SalonError::AlreadyExists { .. } => (StatusCode::CONFLICT, "already_exists"),
                SalonError::AuthenticationFailed { .. } => {
                    (StatusCode::UNAUTHORIZED, "authentication_failed")
                }
                SalonError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation"),
                SalonError::TenantContext => (StatusCode::BAD_REQUEST, "tenant_context"),
                SalonError::DateLocked { .. } => (StatusCode::LOCKED, "date_locked"),
                SalonError::Database(_) | SalonError::Crypto(_) | SalonError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

/// Reasons the server can fail to come up.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database connection: {0}")]
    Connect(#[from] surrealdb::Error),

    #[error("database migration: {0}")]
    Migrate(#[from] DbError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (ApiError::MissingTenant, StatusCode::BAD_REQUEST),
            (ApiError::LedgerUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                SalonError::DateLocked {
                    date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
                }
                .into(),
                StatusCode::LOCKED,
            ),
            (
                SalonError::NotFound {
                    entity: "customer".into(),
                    id: "x".into(),
                }
                .into(),
                StatusCode::NOT_FOUND,
            ),
            (SalonError::Database("boom".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
