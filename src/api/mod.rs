// HTTP surface: /plans, /plans/sales-tax-rates and /health

pub mod auth;
pub mod error;
pub mod handlers;

use crate::service::PlanCatalogService;
use auth::TokenAuthenticator;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: PlanCatalogService,
    pub auth: Arc<TokenAuthenticator>,
}

impl AppState {
    pub fn new(service: PlanCatalogService, auth: TokenAuthenticator) -> Self {
        AppState {
            service,
            auth: Arc::new(auth),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/plans", get(handlers::get_plans))
        .route("/plans/sales-tax-rates", get(handlers::get_tax_rates))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
