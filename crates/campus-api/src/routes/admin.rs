//! Admin moderation routes: list and delete any content item.
//!
//! Admins bypass the evaluator by role, so these handlers guard on
//! the role alone and act directly on the repositories. Enrollment
//! deletion lives here — there is no student-facing unenroll.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get};
use axum::{Json, Router};
use campus_core::repository::{
    AssignmentRepository, ChatMessageRepository, CourseRepository, EnrollmentRepository,
    LectureRepository, LiveSessionRepository, PaginatedResult, SubmissionRepository,
};
use serde::Serialize;
use surrealdb::Connection;
use uuid::Uuid;

use super::{PageParams, require_admin};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router<C: Connection>() -> Router<Arc<AppState<C>>> {
    Router::new()
        .route("/courses", get(list_courses::<C>))
        .route("/courses/{id}", delete(delete_course::<C>))
        .route("/lectures", get(list_lectures::<C>))
        .route("/lectures/{id}", delete(delete_lecture::<C>))
        .route("/assignments", get(list_assignments::<C>))
        .route("/assignments/{id}", delete(delete_assignment::<C>))
        .route("/submissions", get(list_submissions::<C>))
        .route("/submissions/{id}", delete(delete_submission::<C>))
        .route("/messages", get(list_messages::<C>))
        .route("/messages/{id}", delete(delete_message::<C>))
        .route("/live", get(list_live::<C>))
        .route("/live/{id}", delete(delete_live::<C>))
        .route("/enrollments", get(list_enrollments::<C>))
        .route("/enrollments/{id}", delete(delete_enrollment::<C>))
}

#[derive(Debug, Serialize)]
struct AdminList<T> {
    items: Vec<T>,
    total: u64,
}

impl<T> From<PaginatedResult<T>> for AdminList<T> {
    fn from(result: PaginatedResult<T>) -> Self {
        Self {
            items: result.items,
            total: result.total,
        }
    }
}

macro_rules! admin_list {
    ($name:ident, $repo:ident, $item:ty) => {
        async fn $name<C: Connection>(
            State(state): State<Arc<AppState<C>>>,
            headers: HeaderMap,
            Query(page): Query<PageParams>,
        ) -> Result<Json<AdminList<$item>>, ApiError> {
            let actor = state.require_user(&headers)?;
            require_admin(&actor)?;
            let result = state.$repo.list(page.pagination()).await?;
            Ok(Json(result.into()))
        }
    };
}

macro_rules! admin_delete {
    ($name:ident, $repo:ident) => {
        async fn $name<C: Connection>(
            State(state): State<Arc<AppState<C>>>,
            headers: HeaderMap,
            Path(id): Path<Uuid>,
        ) -> Result<StatusCode, ApiError> {
            let actor = state.require_user(&headers)?;
            require_admin(&actor)?;
            state.$repo.delete(id).await?;
            Ok(StatusCode::NO_CONTENT)
        }
    };
}

admin_list!(list_courses, courses, campus_core::models::course::Course);
admin_list!(list_lectures, lectures, campus_core::models::lecture::Lecture);
admin_list!(
    list_assignments,
    assignments,
    campus_core::models::assignment::Assignment
);
admin_list!(
    list_submissions,
    submissions,
    campus_core::models::submission::Submission
);
admin_list!(list_messages, chat, campus_core::models::chat::ChatMessage);
admin_list!(
    list_live,
    live_sessions,
    campus_core::models::live_session::LiveSession
);
admin_list!(
    list_enrollments,
    enrollments,
    campus_core::models::enrollment::EnrollmentRecord
);

admin_delete!(delete_course, courses);
admin_delete!(delete_lecture, lectures);
admin_delete!(delete_assignment, assignments);
admin_delete!(delete_submission, submissions);
admin_delete!(delete_message, chat);
admin_delete!(delete_live, live_sessions);
admin_delete!(delete_enrollment, enrollments);
