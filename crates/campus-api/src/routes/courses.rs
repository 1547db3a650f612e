//! Course routes: public listing, instructor dashboard, and CRUD.
//!
//! Course *metadata* is not gated content — published courses are
//! browsable by anyone, including guests. Drafts read as not found to
//! everyone but the owner and admins.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use campus_core::access;
use campus_core::models::actor::{Actor, Role};
use campus_core::models::course::{Course, CreateCourse, UpdateCourse};
use campus_core::repository::CourseRepository;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use uuid::Uuid;

use super::{PageParams, require_manage};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router<C: Connection>() -> Router<Arc<AppState<C>>> {
    Router::new()
        .route("/", get(list_published::<C>).post(create::<C>))
        .route("/mine", get(list_mine::<C>))
        .route(
            "/{id}",
            put(update::<C>).get(get_course::<C>).delete(delete::<C>),
        )
        .route("/{id}/publish", post(publish::<C>))
}

#[derive(Debug, Serialize)]
struct CourseListResponse {
    courses: Vec<Course>,
    total: u64,
}

async fn list_published<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    Query(page): Query<PageParams>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let result = state.courses.list_published(page.pagination()).await?;
    Ok(Json(CourseListResponse {
        courses: result.items,
        total: result.total,
    }))
}

async fn list_mine<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Query(page): Query<PageParams>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let actor = state.require_user(&headers)?;
    let result = match actor {
        Actor::User {
            role: Role::Admin, ..
        } => state.courses.list(page.pagination()).await?,
        Actor::User {
            id,
            role: Role::Instructor,
        } => {
            state
                .courses
                .list_by_instructor(id, page.pagination())
                .await?
        }
        _ => return Err(ApiError::Forbidden("Instructor access required".into())),
    };
    Ok(Json(CourseListResponse {
        courses: result.items,
        total: result.total,
    }))
}

#[derive(Debug, Deserialize)]
struct CourseRequest {
    title: String,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

async fn create<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Json(body): Json<CourseRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let actor = state.require_user(&headers)?;
    let instructor_id = match actor {
        Actor::User {
            id,
            role: Role::Instructor | Role::Admin,
        } => id,
        _ => return Err(ApiError::Forbidden("Instructor access required".into())),
    };
    if body.title.is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }

    let course = state
        .courses
        .create(CreateCourse {
            instructor_id,
            title: body.title,
            description: body.description,
            tags: body.tags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, ApiError> {
    let actor = state.actor(&headers)?;
    let course = state.courses.get_by_id(id).await?;
    if !access::course_visible(&actor, &course) {
        return Err(ApiError::NotFound);
    }
    Ok(Json(course))
}

#[derive(Debug, Deserialize)]
struct UpdateCourseRequest {
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
}

async fn update<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, ApiError> {
    let actor = state.require_user(&headers)?;
    let course = state.courses.get_by_id(id).await?;
    require_manage(&actor, &course)?;

    let updated = state
        .courses
        .update(
            id,
            UpdateCourse {
                title: body.title,
                description: body.description,
                tags: body.tags,
            },
        )
        .await?;
    Ok(Json(updated))
}

async fn publish<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, ApiError> {
    let actor = state.require_user(&headers)?;
    let course = state.courses.get_by_id(id).await?;
    require_manage(&actor, &course)?;

    let published = state.courses.publish(id).await?;
    Ok(Json(published))
}

async fn delete<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let actor = state.require_user(&headers)?;
    let course = state.courses.get_by_id(id).await?;
    require_manage(&actor, &course)?;

    state.courses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
