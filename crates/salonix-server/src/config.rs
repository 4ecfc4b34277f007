//! Server configuration, assembled from the environment at startup.

use std::env;
use std::net::SocketAddr;

use salonix_auth::{AuthConfig, AuthError};
use salonix_crypto::{CryptoConfig, CryptoError};
use salonix_db::DbConfig;
use thiserror::Error;

use crate::tenancy::ResolverConfig;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("crypto configuration: {0}")]
    Crypto(#[from] CryptoError),

    #[error("auth configuration: {0}")]
    Auth(#[from] AuthError),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub crypto: CryptoConfig,
    pub auth: AuthConfig,
    pub resolver: ResolverConfig,
    pub db: DbConfig,
}

impl ServerConfig {
    /// Load every section from the environment. Missing or malformed
    /// secrets are fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.into());
        let listen_addr = raw_addr.parse().map_err(|e| ConfigError::Invalid {
            key: "LISTEN_ADDR",
            reason: format!("{e}"),
        })?;

        let resolver = ResolverConfig::from_env();
        if resolver.base_domain.is_empty() {
            return Err(ConfigError::Invalid {
                key: "BASE_DOMAIN",
                reason: "must not be empty".into(),
            });
        }

        Ok(Self {
            listen_addr,
            crypto: CryptoConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            resolver,
            db: DbConfig::from_env(),
        })
    }
}
