//! Authentication configuration.

use std::env;
use std::fmt;

use crate::error::AuthError;

/// Configuration for session token handling.
#[derive(Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 public key for JWT verification.
    pub jwt_public_key_pem: String,
    /// PEM-encoded Ed25519 private key for JWT signing. Only needed by
    /// processes that issue tokens.
    pub jwt_private_key_pem: Option<String>,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Session token lifetime in seconds (default: 28_800 = 8 hours).
    pub session_lifetime_secs: u64,
    /// Cookie carrying the session token for browser requests.
    pub session_cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_public_key_pem: String::new(),
            jwt_private_key_pem: None,
            jwt_issuer: "salonix".into(),
            session_lifetime_secs: 28_800,
            session_cookie_name: "salonix_session".into(),
        }
    }
}

impl AuthConfig {
    /// Load from `JWT_PUBLIC_KEY_PEM` (required), `JWT_PRIVATE_KEY_PEM`,
    /// `JWT_ISSUER`, `SESSION_LIFETIME_SECS` and `SESSION_COOKIE_NAME`.
    pub fn from_env() -> Result<Self, AuthError> {
        let defaults = Self::default();

        let jwt_public_key_pem = env::var("JWT_PUBLIC_KEY_PEM")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AuthError::Config("JWT_PUBLIC_KEY_PEM is not set".into()))?;

        let session_lifetime_secs = match env::var("SESSION_LIFETIME_SECS") {
            Ok(v) => v
                .parse()
                .map_err(|e| AuthError::Config(format!("SESSION_LIFETIME_SECS: {e}")))?,
            Err(_) => defaults.session_lifetime_secs,
        };

        Ok(Self {
            jwt_public_key_pem,
            jwt_private_key_pem: env::var("JWT_PRIVATE_KEY_PEM").ok(),
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            session_lifetime_secs,
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or(defaults.session_cookie_name),
        })
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("session_lifetime_secs", &self.session_lifetime_secs)
            .field("session_cookie_name", &self.session_cookie_name)
            .field(
                "jwt_private_key_pem",
                &self.jwt_private_key_pem.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_print_private_key() {
        let config = AuthConfig {
            jwt_public_key_pem: "PUBLIC-PEM-BODY".into(),
            jwt_private_key_pem: Some("PRIVATE-PEM-BODY".into()),
            ..AuthConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("PRIVATE-PEM-BODY"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("salonix_session"));
    }
}
