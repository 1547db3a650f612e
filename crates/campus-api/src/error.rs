//! HTTP error type and the decision-to-status mapping.
//!
//! This is the single translation point from the core's typed
//! failures and access decisions to status codes. Unpublished and
//! nonexistent courses collapse into one indistinguishable 404 so
//! draft existence never leaks.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campus_core::access::Decision;
use campus_core::error::CampusError;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Forbidden(String),
    NotFound,
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required".into())
            }
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".into()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<CampusError> for ApiError {
    fn from(err: CampusError) -> Self {
        match err {
            // A draft course is indistinguishable from a missing one.
            CampusError::NotFound { .. } | CampusError::CourseNotPublished { .. } => {
                ApiError::NotFound
            }
            CampusError::AlreadyExists { entity } => {
                ApiError::Conflict(format!("{entity} already exists"))
            }
            CampusError::AuthenticationFailed { reason } => {
                tracing::debug!(%reason, "authentication failed");
                ApiError::Unauthorized
            }
            CampusError::AuthorizationDenied { reason } => ApiError::Forbidden(reason),
            CampusError::Validation { message } => ApiError::BadRequest(message),
            CampusError::Database(msg) | CampusError::Crypto(msg) | CampusError::Internal(msg) => {
                ApiError::Internal(msg)
            }
        }
    }
}

/// Fail unless the decision allows access.
///
/// `NotEnrolled` keeps its enroll affordance (403); every other deny
/// reads as a generic not-found.
pub fn ensure_allowed(decision: Decision) -> Result<(), ApiError> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::NotEnrolled => Err(ApiError::Forbidden("Enrollment required".into())),
        Decision::CourseUnpublished | Decision::NotFound => Err(ApiError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_mapping_never_distinguishes_drafts() {
        // CourseUnpublished and NotFound must produce identical
        // caller-visible failures.
        let a = ensure_allowed(Decision::CourseUnpublished).unwrap_err();
        let b = ensure_allowed(Decision::NotFound).unwrap_err();
        assert!(matches!(a, ApiError::NotFound));
        assert!(matches!(b, ApiError::NotFound));
    }

    #[test]
    fn not_enrolled_keeps_the_enroll_affordance() {
        let err = ensure_allowed(Decision::NotEnrolled).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn allow_passes() {
        assert!(ensure_allowed(Decision::Allow).is_ok());
    }
}
