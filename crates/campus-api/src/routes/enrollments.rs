//! Enrollment routes — the one mutation of the access model.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use campus_core::models::actor::{Actor, Role};
use campus_core::models::enrollment::EnrollmentRecord;
use campus_core::repository::EnrollmentRepository;
use serde::Serialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router<C: Connection>() -> Router<Arc<AppState<C>>> {
    Router::new()
        .route("/me", get(my_enrollments::<C>))
        .route("/{course_id}", post(enroll::<C>))
}

async fn enroll<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<EnrollmentRecord>), ApiError> {
    let actor = state.require_user(&headers)?;
    let student_id = match actor {
        Actor::User {
            id,
            role: Role::Student,
        } => id,
        _ => return Err(ApiError::Forbidden("Only students enroll".into())),
    };

    // Idempotent: re-enrolling returns the existing record. Missing
    // and unpublished courses both surface as 404 here.
    let record = state
        .enrollment_service
        .enroll(student_id, course_id)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Serialize)]
struct EnrollmentListResponse {
    enrollments: Vec<EnrollmentRecord>,
}

async fn my_enrollments<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
) -> Result<Json<EnrollmentListResponse>, ApiError> {
    let actor = state.require_user(&headers)?;
    let student_id = match actor {
        Actor::User {
            id,
            role: Role::Student,
        } => id,
        _ => return Err(ApiError::Forbidden("Only students hold enrollments".into())),
    };

    let enrollments = state.enrollments.list_by_student(student_id).await?;
    Ok(Json(EnrollmentListResponse { enrollments }))
}
