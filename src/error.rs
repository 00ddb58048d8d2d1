use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Routing service error: {0}")]
    UpstreamService(String),

    #[error("No route found: {0}")]
    NoRouteFound(String),

    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether a failed routing attempt may be followed by another one.
    /// Only upstream outcomes qualify; bad input and missing credentials never recover.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::UpstreamService(_) | AppError::NoRouteFound(_))
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::UpstreamService(ref e) => {
                tracing::error!("Routing service error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Routing service is unavailable, please try again later",
                )
            }
            AppError::NoRouteFound(ref e) => {
                tracing::warn!("No route found: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "No route could be found from this starting point",
                )
            }
            AppError::Misconfiguration(ref e) => {
                tracing::error!("Misconfiguration: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Route service is not configured",
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
