//! Salonix Crypto — deterministic encryption of sensitive fields and
//! keyed blind indexes that make them searchable by prefix without
//! decrypting stored data.

pub mod blind_index;
pub mod cipher;
pub mod config;
pub mod error;
pub mod protector;

pub use blind_index::{BlindIndexer, canonicalize_digits};
pub use cipher::FieldCipher;
pub use config::CryptoConfig;
pub use error::CryptoError;
pub use protector::FieldProtector;
