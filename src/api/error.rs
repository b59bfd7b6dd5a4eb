use crate::error::CatalogError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Errors surfaced to HTTP clients
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Forbidden,
    Catalog(CatalogError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    object: &'static str,
    message: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Catalog(err) if err.is_store_failure() => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store details stay in the logs
        let message = match &self {
            ApiError::Unauthorized => "Unauthorized.",
            ApiError::Forbidden => "Forbidden.",
            ApiError::Catalog(err) => {
                tracing::error!(error = %err, status = status.as_u16(), "request failed");
                "An error has occurred."
            }
        };

        (
            status,
            Json(ErrorResponse {
                object: "error",
                message,
            }),
        )
            .into_response()
    }
}
