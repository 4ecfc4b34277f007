//! SurrealDB implementation of [`CustomerRepository`].
//!
//! Only ciphertext and blind-index tokens are stored; the plaintext
//! phone number never reaches the database.

use chrono::{DateTime, Utc};
use salonix_core::error::SalonResult;
use salonix_core::models::customer::{CreateCustomer, CustomerRecord, EncryptedField};
use salonix_core::repository::CustomerRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CustomerRow {
    tenant_id: String,
    name: String,
    phone_cipher: String,
    phone_index: Vec<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CustomerRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    phone_cipher: String,
    phone_index: Vec<String>,
    created_at: DateTime<Utc>,
}

fn row_to_customer(row: CustomerRow, id: Uuid) -> Result<CustomerRecord, DbError> {
    Ok(CustomerRecord {
        id,
        tenant_id: parse_uuid("tenant", &row.tenant_id)?,
        name: row.name,
        phone: EncryptedField {
            ciphertext: row.phone_cipher,
            blind_index: row.phone_index,
        },
        created_at: row.created_at,
    })
}

impl CustomerRowWithId {
    fn try_into_customer(self) -> Result<CustomerRecord, DbError> {
        let id = parse_uuid("customer", &self.record_id)?;
        row_to_customer(
            CustomerRow {
                tenant_id: self.tenant_id,
                name: self.name,
                phone_cipher: self.phone_cipher,
                phone_index: self.phone_index,
                created_at: self.created_at,
            },
            id,
        )
    }
}

/// SurrealDB implementation of the Customer repository.
#[derive(Clone)]
pub struct SurrealCustomerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCustomerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CustomerRepository for SurrealCustomerRepository<C> {
    async fn create(&self, input: CreateCustomer) -> SalonResult<CustomerRecord> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('customer', $id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, \
                 phone_cipher = $phone_cipher, \
                 phone_index = $phone_index",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("phone_cipher", input.phone.ciphertext))
            .bind(("phone_index", input.phone.blind_index))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("customer", e))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        row_to_customer(row, id).map_err(Into::into)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> SalonResult<CustomerRecord> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('customer', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        row_to_customer(row, id).map_err(Into::into)
    }

    async fn search_by_phone_token(
        &self,
        tenant_id: Uuid,
        token: &str,
        limit: u64,
    ) -> SalonResult<Vec<CustomerRecord>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM customer \
                 WHERE tenant_id = $tenant_id AND phone_index CONTAINS $token \
                 ORDER BY name ASC \
                 LIMIT $limit",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("token", token.to_string()))
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_customer())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
