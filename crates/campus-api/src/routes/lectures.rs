//! Lecture routes.
//!
//! Lecture titles are course metadata; the video URL is gated content.
//! The listing therefore redacts `video_url` unless the evaluator
//! allows the actor, and the dedicated video endpoint is the
//! authoritative way to obtain the pointer.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use campus_core::access;
use campus_core::models::lecture::{CreateLecture, Lecture};
use campus_core::models::resource::ProtectedResource;
use campus_core::repository::{CourseRepository, LectureRepository};
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
        .route("/{id}/video", get(video::<C>))
}

/// A lecture as listed to a viewer: `video_url` present only when the
/// evaluator allowed the actor.
#[derive(Debug, Serialize)]
struct LectureBody {
    id: Uuid,
    course_id: Uuid,
    title: String,
    position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
}

impl LectureBody {
    fn redacted(lecture: Lecture, allowed: bool) -> Self {
        Self {
            id: lecture.id,
            course_id: lecture.course_id,
            title: lecture.title,
            position: lecture.position,
            video_url: if allowed { lecture.video_url } else { None },
        }
    }
}

#[derive(Debug, Serialize)]
struct LectureListResponse {
    lectures: Vec<LectureBody>,
}

async fn list_for_course<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
) -> Result<Json<LectureListResponse>, ApiError> {
    let actor = state.actor(&headers)?;
    let course = state.courses.get_by_id(course_id).await?;
    if !access::course_visible(&actor, &course) {
        return Err(ApiError::NotFound);
    }

    // One decision covers the whole listing; titles stay visible
    // either way.
    let decision = state.evaluator.can_access_course(&actor, course_id).await?;
    let allowed = decision.is_allow();

    let lectures = state.lectures.list_by_course(course_id).await?;
    Ok(Json(LectureListResponse {
        lectures: lectures
            .into_iter()
            .map(|l| LectureBody::redacted(l, allowed))
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
struct CreateLectureRequest {
    title: String,
    video_url: Option<String>,
    #[serde(default)]
    position: u32,
}

async fn create<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
    Json(body): Json<CreateLectureRequest>,
) -> Result<(StatusCode, Json<Lecture>), ApiError> {
    let actor = state.require_user(&headers)?;
    let course = state.courses.get_by_id(course_id).await?;
    require_manage(&actor, &course)?;

    if body.title.is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }

    let lecture = state
        .lectures
        .create(CreateLecture {
            course_id,
            title: body.title,
            video_url: body.video_url,
            position: body.position,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(lecture)))
}

async fn delete<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let actor = state.require_user(&headers)?;
    let lecture = state.lectures.get_by_id(id).await?;
    let course = state.courses.get_by_id(lecture.course_id).await?;
    require_manage(&actor, &course)?;

    state.lectures.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct VideoResponse {
    video_url: String,
}

async fn video<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoResponse>, ApiError> {
    let actor = state.actor(&headers)?;
    let lecture = state.lectures.get_by_id(id).await?;

    let decision = state
        .evaluator
        .can_access(&actor, &ProtectedResource::Lecture(lecture.clone()))
        .await?;
    ensure_allowed(decision)?;

    let video_url = lecture.video_url.ok_or(ApiError::NotFound)?;
    Ok(Json(VideoResponse { video_url }))
}
