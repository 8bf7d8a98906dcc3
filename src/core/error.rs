use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ErrorBody;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Region store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("Upstream weather provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream weather provider returned an unexpected payload: {0}")]
    UpstreamDecode(String),

    #[error("No weather data available: {0}")]
    NoDataAvailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::StoreUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UpstreamUnavailable(_) | AppError::UpstreamDecode(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::NoDataAvailable(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, details) = match self {
            // Infrastructure failures stay opaque to clients; the cause goes to the log
            AppError::StoreUnavailable(ref e) => {
                tracing::error!("Region store error: {:?}", e);
                ("Failed to query region data".to_string(), None)
            }
            AppError::UpstreamUnavailable(ref msg) => {
                tracing::error!("Upstream weather provider error: {}", msg);
                ("Failed to fetch weather data".to_string(), None)
            }
            AppError::UpstreamDecode(ref msg) => {
                tracing::error!("Upstream weather decode error: {}", msg);
                ("Failed to fetch weather data".to_string(), None)
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Timeout(limit) => {
                tracing::warn!("Request exceeded {:?}, cancelled", limit);
                ("Request timed out".to_string(), None)
            }
            AppError::Validation(details) => ("Validation failed".to_string(), Some(details)),
            AppError::NoDataAvailable(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => (msg, None),
        };

        (status, Json(ErrorBody::new(message, details))).into_response()
    }
}

/// Flattens validator output into sorted `field: message` lines
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        details.sort();
        AppError::Validation(details)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
