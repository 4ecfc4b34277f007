//! SurrealDB connection management.

use std::fmt;

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Configuration for connecting to SurrealDB.
#[derive(Clone)]
pub struct DbConfig {
    /// Endpoint URL (e.g., `ws://127.0.0.1:8000`, or `mem://` for an
    /// embedded in-memory store).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Root credentials. `None` skips sign-in (embedded engines).
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8000".into(),
            namespace: "salonix".into(),
            database: "main".into(),
            credentials: Some(("root".into(), "root".into())),
        }
    }
}

impl DbConfig {
    /// Load from `SURREAL_URL`, `SURREAL_NS`, `SURREAL_DB`,
    /// `SURREAL_USER` and `SURREAL_PASS`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let credentials = match (var("SURREAL_USER"), var("SURREAL_PASS")) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => defaults.credentials,
        };

        Self {
            url: var("SURREAL_URL").unwrap_or(defaults.url),
            namespace: var("SURREAL_NS").unwrap_or(defaults.namespace),
            database: var("SURREAL_DB").unwrap_or(defaults.database),
            credentials,
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url)
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("user", &self.credentials.as_ref().map(|(user, _)| user))
            .finish_non_exhaustive()
    }
}

/// Manages a connection to SurrealDB.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Any>,
}

impl DbManager {
    /// Connect to SurrealDB using the provided configuration.
    ///
    /// Authenticates as root when credentials are configured, selects
    /// the namespace and database, and returns a ready-to-use manager.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = any::connect(config.url.as_str()).await?;

        if let Some((username, password)) = &config.credentials {
            db.signin(Root {
                username: username.clone(),
                password: password.clone(),
            })
            .await?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Any> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_print_password() {
        let config = DbConfig {
            credentials: Some(("admin".into(), "s3cret-pass".into())),
            ..DbConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret-pass"));
    }
}
