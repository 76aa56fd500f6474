//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Storage and confirmation failures reach the client as a fixed message;
//! their detail was already logged where it happened.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use botgate_types::error::BotError;

use crate::http::response::{ApiErrorDetail, ApiResponse};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Bot-related errors.
    Bot(BotError),
    /// Authentication failure.
    Unauthorized(String),
    /// The request could not be read (bad JSON, bad query string).
    BadRequest(String),
    /// Generic internal error.
    Internal(String),
}

impl From<BotError> for AppError {
    fn from(e: BotError) -> Self {
        AppError::Bot(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        match self {
            AppError::Bot(BotError::NotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "the requested resource could not be found".to_string(),
                None,
            ),
            AppError::Bot(BotError::Denied) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "you do not have permission to access this resource".to_string(),
                None,
            ),
            AppError::Bot(BotError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "the request contains invalid fields".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            AppError::Bot(BotError::EditConflict) => (
                StatusCode::CONFLICT,
                "EDIT_CONFLICT",
                "unable to update the record due to an edit conflict, please try again"
                    .to_string(),
                None,
            ),
            AppError::Bot(BotError::ExternalService(_)) => (
                StatusCode::BAD_GATEWAY,
                "CONFIRMATION_UNAVAILABLE",
                "the credential could not be confirmed right now, please try again later"
                    .to_string(),
                None,
            ),
            AppError::Bot(BotError::Storage(_)) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "the server encountered a problem and could not process your request"
                    .to_string(),
                None,
            ),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(error = %detail, "internal error");
        }

        let (status, code, message, details) = self.parts();
        let body = ApiResponse::failure(
            ApiErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
            uuid::Uuid::now_v7().to_string(),
        );

        (status, Json(body)).into_response()
    }
}
