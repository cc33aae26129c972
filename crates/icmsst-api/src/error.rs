//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps validation, reference-lookup and preparation errors to HTTP status
//! codes with a JSON body of the form
//! `{ "error": { "code": ..., "message": ... } }`.
//!
//! Every failure a handler can hit is a problem with the request; the
//! engines are total over validated input.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use icmsst_pricing::SimulationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `NOT_FOUND`.
    pub code: String,
    pub message: String,
}

/// Application-level error returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown reference code (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request parsed but failed validation or could not be resolved (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        tracing::debug!(status = status.as_u16(), error = %self, "request rejected");

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<icmsst_core::ValidationError> for AppError {
    fn from(err: icmsst_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Every preparation failure is a problem with the submitted draft.
impl From<SimulationError> for AppError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Validation(inner) => Self::from(inner),
            other => Self::Validation(other.to_string()),
        }
    }
}
