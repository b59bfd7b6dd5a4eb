use super::auth::{MaybeUser, WebUser};
use super::error::ApiError;
use super::AppState;
use crate::responses::{ListResponse, PlanResponse, TaxRateResponse};
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

/// GET /health - Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        version: crate::VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /plans - Plans visible to the caller (public)
pub async fn get_plans(
    MaybeUser(ctx): MaybeUser,
    State(state): State<AppState>,
) -> Json<ListResponse<PlanResponse>> {
    Json(state.service.list_plans(&ctx))
}

/// GET /plans/sales-tax-rates - Active sales tax rates (`Web` policy)
pub async fn get_tax_rates(
    WebUser(ctx): WebUser,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<TaxRateResponse>>, ApiError> {
    tracing::debug!(user = ctx.user_id.as_deref().unwrap_or("-"), "tax rates requested");

    let rates = state.service.list_tax_rates().await?;
    Ok(Json(rates))
}
