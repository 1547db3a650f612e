//! Course-scoped chat routes.
//!
//! Chat rides on the same gate as protected content: enrolled
//! students, the owning instructor, and admins.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use campus_core::models::chat::{ChatMessage, CreateChatMessage};
use campus_core::repository::ChatMessageRepository;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::{ApiError, ensure_allowed};
use crate::state::AppState;

pub fn router<C: Connection>() -> Router<Arc<AppState<C>>> {
    Router::new().route("/{course_id}", get(list::<C>).post(post_message::<C>))
}

#[derive(Debug, Serialize)]
struct ChatListResponse {
    messages: Vec<ChatMessage>,
}

async fn list<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ChatListResponse>, ApiError> {
    let actor = state.actor(&headers)?;
    let decision = state.evaluator.can_access_course(&actor, course_id).await?;
    ensure_allowed(decision)?;

    let messages = state.chat.list_by_course(course_id).await?;
    Ok(Json(ChatListResponse { messages }))
}

#[derive(Debug, Deserialize)]
struct PostMessageRequest {
    content: String,
}

async fn post_message<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(course_id): Path<Uuid>,
    Json(body): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    let actor = state.require_user(&headers)?;
    let sender_id = actor.id().ok_or(ApiError::Unauthorized)?;

    let decision = state.evaluator.can_access_course(&actor, course_id).await?;
    ensure_allowed(decision)?;

    if body.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }

    let message = state
        .chat
        .create(CreateChatMessage {
            course_id,
            sender_id,
            content: body.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}
