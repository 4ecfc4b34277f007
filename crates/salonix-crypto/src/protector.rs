//! Sealing, opening and searching sensitive fields.

use salonix_core::models::customer::{EncryptedField, FieldValue};

use crate::blind_index::{BlindIndexer, canonicalize_digits};
use crate::cipher::FieldCipher;
use crate::config::CryptoConfig;
use crate::error::CryptoError;

/// Field cipher and blind indexer bound together.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct FieldProtector {
    cipher: FieldCipher,
    indexer: BlindIndexer,
}

impl FieldProtector {
    pub fn new(cipher: FieldCipher, indexer: BlindIndexer) -> Self {
        Self { cipher, indexer }
    }

    /// Build from loaded secrets. Fails if the blind-index secret is
    /// unusable.
    pub fn from_config(config: &CryptoConfig) -> Result<Self, CryptoError> {
        Ok(Self {
            cipher: FieldCipher::new(config.field_key, config.field_iv),
            indexer: BlindIndexer::new(&config.blind_index_secret)?,
        })
    }

    /// Encrypt `plaintext` and compute its prefix tokens.
    pub fn seal(&self, plaintext: &str) -> EncryptedField {
        EncryptedField {
            ciphertext: self.cipher.encrypt(plaintext),
            blind_index: self.indexer.prefix_tokens(plaintext),
        }
    }

    pub fn open(&self, field: &EncryptedField) -> FieldValue {
        self.cipher.decrypt(&field.ciphertext)
    }

    /// Token to look up for a partial-number query, or `None` when the
    /// query contains no digits.
    pub fn search_token(&self, query: &str) -> Option<String> {
        let digits = canonicalize_digits(query);
        if digits.is_empty() {
            return None;
        }
        Some(self.indexer.blind_index(&digits))
    }
}
