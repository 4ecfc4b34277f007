//! Salonix Server — application entry point.

use salonix_crypto::FieldProtector;
use salonix_db::{DbManager, run_migrations};
use salonix_server::{
    app, config::ServerConfig, error::StartupError, state::AppState, tenancy::TenantResolver,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("salonix=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Salonix server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    info!("Starting Salonix server...");
    let config = ServerConfig::from_env()?;

    let fields = FieldProtector::from_config(&config.crypto)
        .map_err(|e| StartupError::Config(e.into()))?;

    let db = DbManager::connect(&config.db).await?;
    run_migrations(db.client()).await?;

    let state = AppState::new(db.client().clone(), fields);
    let resolver = TenantResolver::new(config.resolver, config.auth);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Salonix server listening");
    axum::serve(listener, app(state, resolver)).await?;

    Ok(())
}
