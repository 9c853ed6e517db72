//! Error types for the application

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Need at least 2 participants to assign Secret Santas, have {count}")]
    InsufficientParticipants { count: usize },

    #[error("Failed to notify {phone}: {reason}")]
    Notification { phone: String, reason: String },

    #[error("SMS provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable tag, used in session error frames
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::InsufficientParticipants { .. } => "insufficient_participants",
            AppError::Notification { .. } => "notification",
            AppError::Provider(_) => "provider",
            AppError::Http(_) => "http",
            AppError::BadRequest(_) => "bad_request",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(e) | AppError::BadRequest(e) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e })),
            )
                .into_response(),
            AppError::InsufficientParticipants { .. } => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": self.to_string() })),
            )
                .into_response(),
            AppError::Provider(e) => {
                tracing::error!("SMS provider error: {}", e);
                server_error(e.clone())
            }
            AppError::Http(e) => {
                tracing::error!("HTTP error: {}", e);
                server_error(e.to_string())
            }
            AppError::Notification { reason, .. } => {
                tracing::error!("{}", self);
                server_error(reason.clone())
            }
            AppError::Config(e) | AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                server_error(e.clone())
            }
        }
    }
}

fn server_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}

pub type Result<T> = std::result::Result<T, AppError>;
