//! Authentication error types.

use salonix_core::error::SalonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("auth configuration error: {0}")]
    Config(String),
}

impl From<AuthError> for SalonError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                SalonError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => SalonError::Crypto(msg),
            AuthError::Config(msg) => SalonError::Internal(msg),
        }
    }
}
