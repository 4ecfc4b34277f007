//! Secret material for the field cipher and the blind index.

use std::env;
use std::fmt;

use crate::cipher::{IV_LEN, KEY_LEN};
use crate::error::CryptoError;

pub const FIELD_KEY_VAR: &str = "FIELD_ENCRYPTION_KEY";
pub const FIELD_IV_VAR: &str = "FIELD_ENCRYPTION_IV";
pub const BLIND_INDEX_SECRET_VAR: &str = "BLIND_INDEX_SECRET";

/// Process-wide secrets. All three are required; there is no fallback.
#[derive(Clone)]
pub struct CryptoConfig {
    /// AES-256 key.
    pub field_key: [u8; KEY_LEN],
    /// Fixed CBC initialization vector (one AES block).
    pub field_iv: [u8; IV_LEN],
    /// HMAC secret for blind indexes. Must differ from the field key.
    pub blind_index_secret: Vec<u8>,
}

impl CryptoConfig {
    /// Load from `FIELD_ENCRYPTION_KEY` (64 hex chars),
    /// `FIELD_ENCRYPTION_IV` (32 hex chars) and `BLIND_INDEX_SECRET`.
    pub fn from_env() -> Result<Self, CryptoError> {
        Self::from_values(
            env::var(FIELD_KEY_VAR).ok().as_deref(),
            env::var(FIELD_IV_VAR).ok().as_deref(),
            env::var(BLIND_INDEX_SECRET_VAR).ok().as_deref(),
        )
    }

    /// Build from raw (hex) values, validating presence and lengths.
    pub fn from_values(
        key_hex: Option<&str>,
        iv_hex: Option<&str>,
        blind_index_secret: Option<&str>,
    ) -> Result<Self, CryptoError> {
        let field_key = decode_fixed::<KEY_LEN>(FIELD_KEY_VAR, key_hex)?;
        let field_iv = decode_fixed::<IV_LEN>(FIELD_IV_VAR, iv_hex)?;

        let secret = match blind_index_secret {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Err(CryptoError::MissingSecret(BLIND_INDEX_SECRET_VAR)),
        };
        // Reuse counts in either form: raw key bytes or the key's hex text.
        let reuses_key_hex = key_hex.is_some_and(|k| secret.trim().eq_ignore_ascii_case(k.trim()));
        let blind_index_secret = secret.as_bytes().to_vec();
        if reuses_key_hex || blind_index_secret == field_key {
            return Err(CryptoError::InvalidSecret {
                name: BLIND_INDEX_SECRET_VAR,
                reason: "must not reuse the field encryption key".into(),
            });
        }

        Ok(Self {
            field_key,
            field_iv,
            blind_index_secret,
        })
    }
}

fn decode_fixed<const N: usize>(
    name: &'static str,
    value: Option<&str>,
) -> Result<[u8; N], CryptoError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(CryptoError::MissingSecret(name))?;

    let bytes = hex::decode(value).map_err(|e| CryptoError::InvalidSecret {
        name,
        reason: format!("not hex: {e}"),
    })?;

    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| CryptoError::InvalidSecret {
        name,
        reason: format!("expected {N} bytes, got {}", bytes.len()),
    })
}

impl fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoConfig").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const IV: &str = "f0e1d2c3b4a5968778695a4b3c2d1e0f";

    #[test]
    fn valid_values_load() {
        let config = CryptoConfig::from_values(Some(KEY), Some(IV), Some("index-secret")).unwrap();
        assert_eq!(config.field_key[31], 0x1f);
        assert_eq!(config.field_iv[0], 0xf0);
        assert_eq!(config.blind_index_secret, b"index-secret");
    }

    #[test]
    fn missing_values_are_rejected() {
        assert!(matches!(
            CryptoConfig::from_values(None, Some(IV), Some("s")),
            Err(CryptoError::MissingSecret(FIELD_KEY_VAR))
        ));
        assert!(matches!(
            CryptoConfig::from_values(Some(KEY), None, Some("s")),
            Err(CryptoError::MissingSecret(FIELD_IV_VAR))
        ));
        assert!(matches!(
            CryptoConfig::from_values(Some(KEY), Some(IV), Some("  ")),
            Err(CryptoError::MissingSecret(BLIND_INDEX_SECRET_VAR))
        ));
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        // 16-byte key (AES-128 size) is not accepted.
        let short_key = &KEY[..32];
        assert!(matches!(
            CryptoConfig::from_values(Some(short_key), Some(IV), Some("s")),
            Err(CryptoError::InvalidSecret { name: FIELD_KEY_VAR, .. })
        ));
        assert!(matches!(
            CryptoConfig::from_values(Some(KEY), Some(&IV[..30]), Some("s")),
            Err(CryptoError::InvalidSecret { name: FIELD_IV_VAR, .. })
        ));
    }

    #[test]
    fn non_hex_is_rejected() {
        let bad = "zz".repeat(32);
        assert!(CryptoConfig::from_values(Some(&bad), Some(IV), Some("s")).is_err());
    }

    #[test]
    fn blind_index_secret_must_not_reuse_the_key() {
        for secret in [KEY.to_string(), KEY.to_uppercase(), format!(" {KEY} ")] {
            let err = CryptoConfig::from_values(Some(KEY), Some(IV), Some(secret.as_str()))
                .unwrap_err();
            assert!(
                matches!(err, CryptoError::InvalidSecret { name, .. } if name == BLIND_INDEX_SECRET_VAR),
                "{secret:?} accepted"
            );
        }
    }

    #[test]
    fn debug_does_not_print_secrets() {
        let config = CryptoConfig::from_values(Some(KEY), Some(IV), Some("index-secret")).unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("index-secret"));
    }
}
