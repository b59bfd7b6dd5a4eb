// Plan Catalog Service - Web Server

use anyhow::{Context, Result};
use plan_catalog::api::{self, auth::TokenAuthenticator, AppState};
use plan_catalog::{logging, AppConfig, PlanCatalog, PlanCatalogService, SqliteTaxRateStore};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(None).context("Configuration is malformed")?;
    logging::init(&config.logging);

    info!(version = plan_catalog::VERSION, "Plan Catalog Service starting");

    let store = SqliteTaxRateStore::open(&config.database.path)
        .with_context(|| format!("Failed to open database at {}", config.database.path.display()))?;
    info!(path = %config.database.path.display(), "database opened");

    if config.auth.tokens.is_empty() {
        warn!("no API tokens configured; /plans/sales-tax-rates will reject every request");
    }

    let service = PlanCatalogService::new(
        PlanCatalog::standard(),
        Arc::new(config.flags.clone()),
        Arc::new(store),
    );
    let state = AppState::new(service, TokenAuthenticator::new(config.auth.tokens.clone()));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind))?;

    info!(address = %config.server.bind, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
