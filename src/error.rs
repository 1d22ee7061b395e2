// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::examspec::SpecError;
use crate::grading::GradingError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (form/spec validation, malformed input)
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., not enough questions in the pool)
    Conflict(String),

    // 422 Unprocessable (exam data integrity broken; grading must not proceed)
    Unprocessable(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Spec-validation failures are always a client-side form problem.
impl From<SpecError> for AppError {
    fn from(err: SpecError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Grading-integrity failures block grading; a result derived from them must
/// never be persisted. An out-of-range override targets a row that does not
/// exist.
impl From<GradingError> for AppError {
    fn from(err: GradingError) -> Self {
        match err {
            GradingError::QuestionNotFound { .. } => AppError::NotFound(err.to_string()),
            GradingError::EmptyExam | GradingError::MissingAnswerKey { .. } => {
                AppError::Unprocessable(err.to_string())
            }
        }
    }
}
