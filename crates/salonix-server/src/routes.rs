use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use salonix_core::{
    error::SalonError,
    models::customer::{CreateCustomer, Customer, CustomerRecord},
    repository::{CustomerRepository, TenantRepository},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState, tenancy::VerifiedTenant};

const DEFAULT_SEARCH_LIMIT: u64 = 20;
const MAX_SEARCH_LIMIT: u64 = 100;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(platform_home))
        .route("/login", get(login_page))
        .route("/api/tenant", get(current_tenant))
        .route("/api/customers", post(create_customer))
        .route("/api/customers/search", get(search_customers))
        .route("/api/customers/:id", get(get_customer))
        .route("/api/day-closings", post(close_day))
        .route("/api/day-closings/lock", get(lock_status))
        .route("/:subdomain", get(tenant_home))
        .route("/:subdomain/*page", get(tenant_page))
        .with_state(state)
}

pub async fn platform_home() -> impl IntoResponse {
    Json(json!({ "service": "salonix" }))
}

#[derive(Deserialize)]
pub struct LoginQuery {
    error: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    Json(json!({ "page": "login", "error": query.error }))
}

pub async fn current_tenant(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.tenants.get_by_id(tenant.id()).await?;
    Ok(Json(profile))
}

pub async fn tenant_home(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
    Path(subdomain): Path<String>,
    OriginalUri(original): OriginalUri,
) -> Result<impl IntoResponse, ApiError> {
    render_page(&state, tenant, &subdomain, original.path()).await
}

pub async fn tenant_page(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
    Path((subdomain, _page)): Path<(String, String)>,
    OriginalUri(original): OriginalUri,
) -> Result<impl IntoResponse, ApiError> {
    render_page(&state, tenant, &subdomain, original.path()).await
}

/// Tenant pages are only served under the verified tenant's own prefix.
async fn render_page(
    state: &AppState,
    tenant: VerifiedTenant,
    subdomain: &str,
    visible_path: &str,
) -> Result<Json<serde_json::Value>, ApiError> {
    let profile = state.tenants.get_by_id(tenant.id()).await?;
    if profile.subdomain != subdomain {
        return Err(SalonError::NotFound {
            entity: "page".into(),
            id: visible_path.into(),
        }
        .into());
    }
    Ok(Json(json!({
        "tenant": profile.name,
        "subdomain": profile.subdomain,
        "path": visible_path,
    })))
}

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    name: String,
    phone: String,
}

pub async fn create_customer(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    if !body.phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::BadRequest("phone must contain digits".into()));
    }

    let record = state
        .customers
        .create(CreateCustomer {
            tenant_id: tenant.id(),
            name: name.to_owned(),
            phone: state.fields.seal(&body.phone),
        })
        .await?;

    info!(tenant_id = %tenant, customer_id = %record.id, "Customer created");
    Ok((StatusCode::CREATED, Json(open_customer(&state, record))))
}

pub async fn get_customer(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.customers.get_by_id(tenant.id(), id).await?;
    Ok(Json(open_customer(&state, record)))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    phone: String,
    limit: Option<u64>,
}

pub async fn search_customers(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .fields
        .search_token(&query.phone)
        .ok_or_else(|| ApiError::BadRequest("phone query must contain digits".into()))?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    let records = state
        .customers
        .search_by_phone_token(tenant.id(), &token, limit)
        .await?;
    let customers: Vec<Customer> = records
        .into_iter()
        .map(|r| open_customer(&state, r))
        .collect();
    Ok(Json(customers))
}

fn open_customer(state: &AppState, record: CustomerRecord) -> Customer {
    Customer {
        phone: state.fields.open(&record.phone),
        id: record.id,
        tenant_id: record.tenant_id,
        name: record.name,
        created_at: record.created_at,
    }
}

#[derive(Deserialize)]
pub struct CloseDayRequest {
    date: NaiveDate,
    closed_by: Option<Uuid>,
}

pub async fn close_day(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
    Json(body): Json<CloseDayRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let closing = state
        .closings
        .close_day(tenant.id(), body.date, body.closed_by)
        .await?;
    Ok((StatusCode::CREATED, Json(closing)))
}

#[derive(Deserialize)]
pub struct LockQuery {
    date: NaiveDate,
}

pub async fn lock_status(
    State(state): State<AppState>,
    tenant: VerifiedTenant,
    Query(query): Query<LockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // A failed lookup must never read as "unlocked".
    let locked = state
        .closings
        .is_date_locked(tenant.id(), query.date)
        .await
        .map_err(|e| {
            error!(tenant_id = %tenant, error = %e, "Day-closing lookup failed");
            ApiError::LedgerUnavailable
        })?;
    Ok(Json(json!({ "date": query.date, "locked": locked })))
}
