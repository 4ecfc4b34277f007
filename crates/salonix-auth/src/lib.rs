//! Salonix Auth — session token (JWT) issuance and verification.
//!
//! Tokens bind a user to exactly one tenant and carry that tenant's
//! subdomain so the edge router can cross-check it against the host.

pub mod config;
pub mod error;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use token::{SessionClaims, SessionSubject};
