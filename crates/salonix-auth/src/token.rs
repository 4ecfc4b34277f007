//! Session JWT issuance and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    /// Tenant ID (UUID string). Always present on correctly issued
    /// tokens; decoded as optional so its absence can be reported as an
    /// issuer defect rather than a parse failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Subdomain of the tenant the session belongs to.
    pub subdomain: String,
    /// Role name (e.g. `owner`, `staff`).
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

impl SessionClaims {
    /// Tenant claim parsed as a UUID. `None` if missing, empty or
    /// malformed.
    pub fn tenant_uuid(&self) -> Option<Uuid> {
        self.tenant_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }
}

/// Who a session token is issued to.
#[derive(Debug, Clone)]
pub struct SessionSubject {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub subdomain: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// Issue a signed EdDSA (Ed25519) session token.
pub fn issue_session_token(
    subject: SessionSubject,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: subject.user_id.to_string(),
        tenant_id: Some(subject.tenant_id.to_string()),
        subdomain: subject.subdomain,
        role: subject.role,
        permissions: subject.permissions,
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.session_lifetime_secs as i64,
        jti: Uuid::new_v4().to_string(),
    };
    sign_claims(&claims, config)
}

/// Sign an arbitrary claim set with the configured private key.
pub fn sign_claims(claims: &SessionClaims, config: &AuthConfig) -> Result<String, AuthError> {
    let pem = config
        .jwt_private_key_pem
        .as_deref()
        .ok_or_else(|| AuthError::Config("no JWT private key configured".into()))?;

    let key = EncodingKey::from_ed_pem(pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad private key: {e}")))?;

    let header = Header::new(Algorithm::EdDSA);
    jsonwebtoken::encode(&header, claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a session token (signature, expiry, issuer).
///
/// Stateless: no database lookup is performed.
pub fn decode_session_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_ed_pem(config.jwt_public_key_pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad public key: {e}")))?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}
