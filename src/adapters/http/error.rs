//! Mapping of domain errors onto HTTP responses.

use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<T, ApiError>;

fn error(status: StatusCode, error: String, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
        }),
    )
}

/// Status code and stable error code for a domain error.
///
/// Store failures are reported with a generic message; the detail goes to the log.
pub fn domain_error(err: DomainError) -> ApiError {
    let code = match &err {
        DomainError::ValidationFailed(_) => "VALIDATION_ERROR",
        DomainError::Conflict(_) => "CONFLICT",
        DomainError::DanglingReference(_) => "DANGLING_REFERENCE",
        DomainError::DuplicateAssociation { .. } => "DUPLICATE_ASSOCIATION",
        DomainError::ParentCycle(_) => "PARENT_CYCLE",
        DomainError::CheckInRejected { .. } => "CHECK_IN_REJECTED",
        DomainError::ClientNotFound(_) | DomainError::ClientTypeNotFound(_) | DomainError::ConfigNotFound(_) => {
            "NOT_FOUND"
        }
        DomainError::DatabaseError(_) | DomainError::SerializationError(_) => {
            tracing::error!(error = %err, "request failed");
            return error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The operation could not be completed".to_string(),
                "STORE_ERROR",
            );
        }
    };

    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_REQUEST
    };
    error(status, err.to_string(), code)
}
