//! Mapping of request and service failures onto HTTP responses.

use crate::app::sample_service::ServiceError;
use crate::domain::sample::FieldError;
use crate::transport::http::types::ApiResponse;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more payload fields broke a constraint.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// The request could not be parsed at all (body, path or query).
    #[error("{0}")]
    BadRequest(String),

    #[error("Sample identifier already exists: {0}")]
    DuplicateIdentifier(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::DuplicateIdentifier(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::DuplicateIdentifier(identifier) => ApiError::DuplicateIdentifier(identifier),
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", err.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(err: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid path parameter: {}", err.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", err.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (data, message) = match self {
            ApiError::Validation(errors) => (
                Some(serde_json::json!({ "errors": errors })),
                "Validation failed".to_string(),
            ),
            ApiError::Internal(detail) => {
                // Storage details stay in the log.
                error!(error = %detail, "request failed");
                (None, "Internal server error".to_string())
            }
            other => (None, other.to_string()),
        };

        (
            status,
            Json(ApiResponse {
                success: false,
                data,
                error: Some(message),
            }),
        )
            .into_response()
    }
}
