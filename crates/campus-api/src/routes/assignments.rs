//! Assignment and submission routes.
//!
//! Unlike lectures, an assignment has no public metadata: the whole
//! listing is gated content, so the evaluator guards the collection
//! itself.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use campus_core::models::actor::{Actor, Role};
use campus_core::models::assignment::{Assignment, CreateAssignment};
use campus_core::models::resource::ProtectedResource;
use campus_core::models::submission::{CreateSubmission, Submission};
use campus_core::repository::{AssignmentRepository, CourseRepository, SubmissionRepository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use uuid::Uuid;

use super::require_manage;
use crate::error::{ApiError, ensure_allowed};
use crate::state::AppState;

pub fn router<C: Connection>() -> Router<Arc<AppState<C>>> {
    Router::new()
        .route(
            "/course/{course_id}",
            get(list_for_course::<C>).post(create::<C>),
        )
        .route("/{id}", axum::routing::delete(delete::<C>))
        .route(
            "/{id}/submissions",
            get(list_submissions::<C>).post(submit::<C>),
        )
        .route("/{id}/submissions/mine", get(my_submission::<C>))
}

#[derive(Debug, Serialize)]
struct AssignmentListResponse {
    assignments: Vec<Assignment>,
}

async fn list_for_course<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
) -> Result<Json<AssignmentListResponse>, ApiError> {
    let actor = state.actor(&headers)?;
    let decision = state.evaluator.can_access_course(&actor, course_id).await?;
    ensure_allowed(decision)?;

    let assignments = state.assignments.list_by_course(course_id).await?;
    Ok(Json(AssignmentListResponse { assignments }))
}

#[derive(Debug, Deserialize)]
struct CreateAssignmentRequest {
    title: String,
    #[serde(default)]
    description: String,
    due_at: Option<DateTime<Utc>>,
}

async fn create<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
    Json(body): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let actor = state.require_user(&headers)?;
    let course = state.courses.get_by_id(course_id).await?;
    require_manage(&actor, &course)?;

    if body.title.is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }

    let assignment = state
        .assignments
        .create(CreateAssignment {
            course_id,
            title: body.title,
            description: body.description,
            due_at: body.due_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

async fn delete<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let actor = state.require_user(&headers)?;
    let assignment = state.assignments.get_by_id(id).await?;
    let course = state.courses.get_by_id(assignment.course_id).await?;
    require_manage(&actor, &course)?;

    state.assignments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    file_url: String,
}

async fn submit<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let actor = state.require_user(&headers)?;
    let student_id = match actor {
        Actor::User {
            id,
            role: Role::Student,
        } => id,
        _ => return Err(ApiError::Forbidden("Only students submit work".into())),
    };
    if body.file_url.is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }

    let assignment = state.assignments.get_by_id(id).await?;
    let decision = state
        .evaluator
        .can_access(&actor, &ProtectedResource::Assignment(assignment.clone()))
        .await?;
    ensure_allowed(decision)?;

    let submission = state
        .submissions
        .create(CreateSubmission {
            assignment_id: assignment.id,
            course_id: assignment.course_id,
            student_id,
            file_url: body.file_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// A student's own submission — the file URL is their own content,
/// but it still travels through the course gate.
async fn my_submission<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, ApiError> {
    let actor = state.require_user(&headers)?;
    let student_id = match actor {
        Actor::User {
            id,
            role: Role::Student,
        } => id,
        _ => return Err(ApiError::Forbidden("Only students submit work".into())),
    };

    let assignment = state.assignments.get_by_id(id).await?;
    let decision = state
        .evaluator
        .can_access(&actor, &ProtectedResource::Assignment(assignment))
        .await?;
    ensure_allowed(decision)?;

    let submission = state
        .submissions
        .list_by_assignment(id)
        .await?
        .into_iter()
        .find(|s| s.student_id == student_id)
        .ok_or(ApiError::NotFound)?;
    Ok(Json(submission))
}

#[derive(Debug, Serialize)]
struct SubmissionListResponse {
    submissions: Vec<Submission>,
}

async fn list_submissions<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionListResponse>, ApiError> {
    let actor = state.require_user(&headers)?;
    let assignment = state.assignments.get_by_id(id).await?;
    let course = state.courses.get_by_id(assignment.course_id).await?;
    require_manage(&actor, &course)?;

    let submissions = state.submissions.list_by_assignment(id).await?;
    Ok(Json(SubmissionListResponse { submissions }))
}
