//! Authentication routes: register, login, refresh, logout, me.

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use campus_auth::service::{LoginInput, RegisterInput};
use campus_core::models::actor::Role;
use campus_core::models::user::User;
use campus_core::repository::UserRepository;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router<C: Connection>() -> Router<Arc<AppState<C>>> {
    Router::new()
        .route("/register", post(register::<C>))
        .route("/login", post(login::<C>))
        .route("/refresh", post(refresh::<C>))
        .route("/logout", post(logout::<C>))
        .route("/me", get(me::<C>))
}

/// A user as serialized to clients — never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: &'static str,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    /// Defaults to `Student`.
    role: Option<String>,
}

async fn register<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserBody>), ApiError> {
    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }
    let role = match body.role.as_deref() {
        None => Role::Student,
        Some(raw) => {
            Role::parse(raw).ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {raw}")))?
        }
    };

    let user = state
        .auth
        .register(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserBody>,
}

async fn login<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("Missing fields".into()));
    }

    let output = state
        .auth
        .login(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        expires_in: output.expires_in,
        user: Some(output.user.into()),
    }))
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

async fn refresh<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let output = state.auth.refresh(&body.refresh_token).await?;

    Ok(Json(TokenResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        expires_in: output.expires_in,
        user: None,
    }))
}

async fn logout<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    Json(body): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    state.auth.logout(&body.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me<C: Connection>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
) -> Result<Json<UserBody>, ApiError> {
    let actor = state.require_user(&headers)?;
    // require_user only passes authenticated actors.
    let id = actor.id().ok_or(ApiError::Unauthorized)?;
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user.into()))
}
