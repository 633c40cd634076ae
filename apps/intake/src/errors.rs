use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ApiEnvelope;

pub const SECURITY_CHECK_FAILED: &str = "Security check failed.";
pub const DELETE_FAILED: &str =
    "Error deleting application. Application may not exist or database error.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Rejections a user can act on are rendered as `200 OK` with
/// `success: false`, so the form script shows the message instead of the
/// generic retry notice.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Security check failed.")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Persistence(String),

    #[error("Error deleting application. Application may not exist or database error.")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The message placed in the envelope's `data` field.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => SECURITY_CHECK_FAILED.to_string(),
            AppError::Validation(msg) | AppError::Upload(msg) | AppError::Persistence(msg) => {
                msg.clone()
            }
            AppError::NotFound => DELETE_FAILED.to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(_) => "An internal server error occurred.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => {
                tracing::warn!("Rejected request with invalid form token");
                StatusCode::OK
            }
            AppError::Validation(_) | AppError::NotFound => StatusCode::OK,
            AppError::Upload(msg) => {
                tracing::error!("Upload error: {msg}");
                StatusCode::OK
            }
            AppError::Persistence(msg) => {
                tracing::error!("Persistence error: {msg}");
                StatusCode::OK
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {msg}");
                StatusCode::BAD_REQUEST
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ApiEnvelope::failure(self.user_message()))).into_response()
    }
}
