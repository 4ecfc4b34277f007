//! AES-256-CBC field encryption with a fixed key and IV.
//!
//! Encryption is deterministic: equal plaintexts always produce equal
//! ciphertexts, and no per-record IV is stored. Prefix search goes
//! through [`crate::blind_index`].

use std::fmt;

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, Iv, Key, KeyIvInit};
use salonix_core::models::customer::FieldValue;
use tracing::debug;

use crate::error::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256 key size in bytes.
pub const KEY_LEN: usize = 32;
/// AES block size in bytes.
pub const IV_LEN: usize = 16;

/// Symmetric cipher for individual field values.
#[derive(Clone)]
pub struct FieldCipher {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl FieldCipher {
    pub fn new(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Encrypt a value. Returns `base64(ciphertext)`.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let ciphertext = Aes256CbcEnc::new(
            Key::<Aes256CbcEnc>::from_slice(&self.key),
            Iv::<Aes256CbcEnc>::from_slice(&self.iv),
        )
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        STANDARD.encode(ciphertext)
    }

    /// Decrypt a value produced by [`encrypt`](Self::encrypt).
    pub fn try_decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let ciphertext = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::Decrypt(format!("base64 decode: {e}")))?;

        let plaintext = Aes256CbcDec::new(
            Key::<Aes256CbcDec>::from_slice(&self.key),
            Iv::<Aes256CbcDec>::from_slice(&self.iv),
        )
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|e| CryptoError::Decrypt(format!("AES-CBC decrypt: {e}")))?;

        String::from_utf8(plaintext).map_err(|e| CryptoError::Decrypt(format!("utf-8: {e}")))
    }

    /// Decrypt a value, degrading to [`FieldValue::Undecryptable`] on any
    /// failure so one bad field never fails the whole record.
    pub fn decrypt(&self, encoded: &str) -> FieldValue {
        match self.try_decrypt(encoded) {
            Ok(plain) => FieldValue::Plain(plain),
            Err(e) => {
                debug!(error = %e, "field left undecryptable");
                FieldValue::Undecryptable
            }
        }
    }
}

impl fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}
