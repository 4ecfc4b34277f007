//! Cryptography error types.

use salonix_core::error::SalonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("required secret {0} is not set")]
    MissingSecret(&'static str),

    #[error("secret {name} is malformed: {reason}")]
    InvalidSecret { name: &'static str, reason: String },

    #[error("decryption failed: {0}")]
    Decrypt(String),
}

impl From<CryptoError> for SalonError {
    fn from(err: CryptoError) -> Self {
        SalonError::Crypto(err.to_string())
    }
}
