//! API error type and its HTTP translation
//!
//! | Failure                  | Status | Body                                               |
//! |--------------------------|--------|----------------------------------------------------|
//! | input validation         | 400    | `{error: "Invalid ...", details: [{field, reason}]}` |
//! | record not found         | 404    | `{error: "Composer not found", message}`           |
//! | uniqueness conflict      | 409    | `{error: "Composer already exists", details}`      |
//! | rate limit exceeded      | 429    | `{error: "Too many requests"}`                     |
//! | any other store failure  | 500    | `{details: {code, message}}`                       |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::store::StoreError;
use crate::validation::{InputSource, ValidationFailure};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request input broke one or more field rules (400)
    #[error("{}: {} issue(s)", .0.source.message(), .0.issues.len())]
    InvalidInput(ValidationFailure),

    /// No composer with the requested id (404)
    #[error("Composer not found")]
    NotFound,

    /// Name already taken (409)
    #[error("Composer already exists ({field} = {value})")]
    Conflict { field: String, value: String },

    /// Process-wide request budget exhausted (429)
    #[error("Too many requests")]
    RateLimited,

    /// Unclassified store failure (500)
    #[error("Store failure {code}: {message}")]
    Store { code: String, message: String },
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::InvalidInput(failure)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Conflict { field, value } => ApiError::Conflict { field, value },
            // The store re-checks the same rules as the body validator
            StoreError::Validation(issues) => {
                ApiError::InvalidInput(ValidationFailure::new(InputSource::Body, issues))
            }
            StoreError::Backend { code, message } => ApiError::Store { code, message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidInput(failure) => {
                debug!(source = ?failure.source, issues = ?failure.issues, "Rejected request input");
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": failure.source.message(),
                        "details": failure.issues,
                    }),
                )
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Composer not found",
                    "message": "No composer found with the given ID",
                }),
            ),
            ApiError::Conflict { field, value } => {
                warn!(%field, %value, "Uniqueness conflict");
                (
                    StatusCode::CONFLICT,
                    json!({
                        "error": "Composer already exists",
                        "details": { "field": field, "value": value },
                    }),
                )
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Too many requests" }),
            ),
            ApiError::Store { code, message } => {
                error!(%code, %message, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "details": { "code": code, "message": message },
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
