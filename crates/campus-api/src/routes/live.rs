//! Live session routes.
//!
//! Session titles and start times are course metadata; the meeting
//! URL is gated content, redacted from listings unless the evaluator
//! allows the actor and served authoritatively by the join endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use campus_core::access;
use campus_core::models::live_session::{CreateLiveSession, LiveSession};
use campus_core::models::resource::ProtectedResource;
use campus_core::repository::{CourseRepository, LiveSessionRepository};
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
            get(list_for_course::<C>).post(schedule::<C>),
        )
        .route("/{id}", axum::routing::delete(cancel::<C>))
        .route("/{id}/join", get(join::<C>))
}

/// A live session as listed to a viewer: `meet_url` present only when
/// the evaluator allowed the actor.
#[derive(Debug, Serialize)]
struct LiveSessionBody {
    id: Uuid,
    course_id: Uuid,
    title: String,
    start_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meet_url: Option<String>,
}

impl LiveSessionBody {
    fn redacted(session: LiveSession, allowed: bool) -> Self {
        Self {
            id: session.id,
            course_id: session.course_id,
            title: session.title,
            start_at: session.start_at,
            meet_url: allowed.then_some(session.meet_url),
        }
    }
}

#[derive(Debug, Serialize)]
struct LiveSessionListResponse {
    sessions: Vec<LiveSessionBody>,
}

async fn list_for_course<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
) -> Result<Json<LiveSessionListResponse>, ApiError> {
    let actor = state.actor(&headers)?;
    let course = state.courses.get_by_id(course_id).await?;
    if !access::course_visible(&actor, &course) {
        return Err(ApiError::NotFound);
    }

    let decision = state.evaluator.can_access_course(&actor, course_id).await?;
    let allowed = decision.is_allow();

    let sessions = state.live_sessions.list_by_course(course_id).await?;
    Ok(Json(LiveSessionListResponse {
        sessions: sessions
            .into_iter()
            .map(|s| LiveSessionBody::redacted(s, allowed))
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
struct ScheduleRequest {
    title: String,
    start_at: DateTime<Utc>,
    /// Provisioned by the external meeting integration.
    meet_url: String,
}

async fn schedule<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
    Json(body): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<LiveSession>), ApiError> {
    let actor = state.require_user(&headers)?;
    let course = state.courses.get_by_id(course_id).await?;
    require_manage(&actor, &course)?;

    if body.title.is_empty() || body.meet_url.is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }

    let session = state
        .live_sessions
        .create(CreateLiveSession {
            course_id,
            title: body.title,
            start_at: body.start_at,
            meet_url: body.meet_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

async fn cancel<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let actor = state.require_user(&headers)?;
    let session = state.live_sessions.get_by_id(id).await?;
    let course = state.courses.get_by_id(session.course_id).await?;
    require_manage(&actor, &course)?;

    state.live_sessions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct JoinResponse {
    meet_url: String,
}

async fn join<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<JoinResponse>, ApiError> {
    let actor = state.actor(&headers)?;
    let session = state.live_sessions.get_by_id(id).await?;

    let decision = state
        .evaluator
        .can_access(&actor, &ProtectedResource::LiveSession(session.clone()))
        .await?;
    ensure_allowed(decision)?;

    Ok(Json(JoinResponse {
        meet_url: session.meet_url,
    }))
}
