//! Customer domain model.
//!
//! The phone number is the sensitive field: it is stored as an
//! [`EncryptedField`] and only ever leaves the crypto layer as a
//! [`FieldValue`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Placeholder shown in place of a field that could not be decrypted.
pub const UNDECRYPTABLE_PLACEHOLDER: &str = "[undecryptable]";

/// Persisted shape of a sensitive field: ciphertext plus the blind-index
/// tokens used to search it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    /// Base64 ciphertext of the full value.
    pub ciphertext: String,
    /// One token per prefix length of the canonicalized value.
    pub blind_index: Vec<String>,
}

/// A decrypted sensitive field.
///
/// `Undecryptable` means the value exists but is unavailable (corrupted
/// ciphertext, foreign key). It is not the same as "no value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Plain(String),
    Undecryptable,
}

impl FieldValue {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            FieldValue::Plain(s) => Some(s),
            FieldValue::Undecryptable => None,
        }
    }

    pub fn is_undecryptable(&self) -> bool {
        matches!(self, FieldValue::Undecryptable)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Plain(s) => f.write_str(s),
            FieldValue::Undecryptable => f.write_str(UNDECRYPTABLE_PLACEHOLDER),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Customer record as stored: the phone is still encrypted.
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub phone: EncryptedField,
    pub created_at: DateTime<Utc>,
}

/// Customer as returned to callers, with the phone opened.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub phone: FieldValue,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a new customer. The phone must already be
/// sealed by the crypto layer.
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub tenant_id: Uuid,
    pub name: String,
    pub phone: EncryptedField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecryptable_serializes_as_placeholder() {
        let json = serde_json::to_string(&FieldValue::Undecryptable).unwrap();
        assert_eq!(json, "\"[undecryptable]\"");
    }

    #[test]
    fn plain_serializes_as_value() {
        let json = serde_json::to_string(&FieldValue::Plain("98765".into())).unwrap();
        assert_eq!(json, "\"98765\"");
    }
}
