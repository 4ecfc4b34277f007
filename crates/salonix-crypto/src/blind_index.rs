//! Keyed blind indexes (HMAC-SHA256) for searching encrypted fields.
//!
//! A blind index is a deterministic, non-reversible token. Storing one
//! token per prefix of a phone number lets "starts with" queries run as
//! plain equality lookups on the token set. Rotating the secret changes
//! every token; existing indexes must be regenerated by a migration.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::BLIND_INDEX_SECRET_VAR;
use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Strip everything except ASCII digits, so `98765-43210` and
/// `98765 43210` index identically.
pub fn canonicalize_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Generates blind-index tokens under one secret.
#[derive(Clone)]
pub struct BlindIndexer {
    /// Pre-keyed MAC, cloned for every token.
    mac: HmacSha256,
}

impl BlindIndexer {
    /// Create an indexer. An empty secret is refused: an unkeyed hash of
    /// a phone number is trivially brute-forced.
    pub fn new(secret: &[u8]) -> Result<Self, CryptoError> {
        if secret.is_empty() {
            return Err(CryptoError::MissingSecret(BLIND_INDEX_SECRET_VAR));
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|e| CryptoError::InvalidSecret {
            name: BLIND_INDEX_SECRET_VAR,
            reason: e.to_string(),
        })?;
        Ok(Self { mac })
    }

    /// Hex HMAC-SHA256 of the raw value.
    pub fn blind_index(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// One token per prefix length (1..=len) of the digits-only form of
    /// `value`, shortest prefix first. Empty if `value` has no digits.
    pub fn prefix_tokens(&self, value: &str) -> Vec<String> {
        let digits = canonicalize_digits(value);
        // Digits are ASCII, so every byte offset is a char boundary.
        (1..=digits.len())
            .map(|len| self.blind_index(&digits[..len]))
            .collect()
    }
}

impl fmt::Debug for BlindIndexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlindIndexer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexer() -> BlindIndexer {
        BlindIndexer::new(b"test-index-secret").unwrap()
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            BlindIndexer::new(b""),
            Err(CryptoError::MissingSecret(_))
        ));
    }

    #[test]
    fn blind_index_is_deterministic() {
        let idx = indexer();
        assert_eq!(idx.blind_index("9876"), idx.blind_index("9876"));
        assert_eq!(idx.blind_index("9876").len(), 64);
    }

    #[test]
    fn different_secret_gives_unrelated_token() {
        let a = BlindIndexer::new(b"secret-a").unwrap();
        let b = BlindIndexer::new(b"secret-b").unwrap();
        assert_ne!(a.blind_index("9876"), b.blind_index("9876"));
    }

    #[test]
    fn canonicalize_strips_formatting() {
        assert_eq!(canonicalize_digits("+91 98765-43210"), "919876543210");
        assert_eq!(canonicalize_digits("(555) 010"), "555010");
        assert_eq!(canonicalize_digits("no digits"), "");
    }

    #[test]
    fn prefix_tokens_cover_every_prefix() {
        let idx = indexer();
        let tokens = idx.prefix_tokens("98765-43210");
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[0], idx.blind_index("9"));
        assert_eq!(tokens[3], idx.blind_index("9876"));
        assert_eq!(tokens[9], idx.blind_index("9876543210"));
    }

    #[test]
    fn formatting_does_not_change_tokens() {
        let idx = indexer();
        assert_eq!(idx.prefix_tokens("98765-43210"), idx.prefix_tokens("98765 43210"));
    }

    #[test]
    fn partial_query_matches_stored_prefix() {
        let idx = indexer();
        let stored = idx.prefix_tokens("98765-43210");
        assert!(stored.contains(&idx.blind_index("9876")));
        assert!(!stored.contains(&idx.blind_index("1234")));
    }

    #[test]
    fn no_digits_no_tokens() {
        assert!(indexer().prefix_tokens("n/a").is_empty());
    }
}
