//! Shared application state: repositories and services over one
//! SurrealDB connection, plus per-request actor resolution.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use campus_auth::config::AuthConfig;
use campus_auth::service::AuthService;
use campus_auth::token;
use campus_core::access::AccessEvaluator;
use campus_core::enrollment::EnrollmentService;
use campus_core::models::actor::Actor;
use campus_db::repository::{
    SurrealAssignmentRepository, SurrealAuthSessionRepository, SurrealChatMessageRepository,
    SurrealCourseRepository, SurrealEnrollmentRepository, SurrealLectureRepository,
    SurrealLiveSessionRepository, SurrealResourceCatalog, SurrealSubmissionRepository,
    SurrealUserRepository,
};
use surrealdb::{Connection, Surreal};

use crate::error::ApiError;

/// Everything a route handler needs, behind one `Arc`.
///
/// Generic over the SurrealDB connection type so integration tests
/// can run against the in-memory engine.
pub struct AppState<C: Connection> {
    pub users: SurrealUserRepository<C>,
    pub courses: SurrealCourseRepository<C>,
    pub lectures: SurrealLectureRepository<C>,
    pub assignments: SurrealAssignmentRepository<C>,
    pub submissions: SurrealSubmissionRepository<C>,
    pub live_sessions: SurrealLiveSessionRepository<C>,
    pub enrollments: SurrealEnrollmentRepository<C>,
    pub chat: SurrealChatMessageRepository<C>,
    pub auth: AuthService<SurrealUserRepository<C>, SurrealAuthSessionRepository<C>>,
    pub evaluator: AccessEvaluator<SurrealResourceCatalog<C>, SurrealEnrollmentRepository<C>>,
    pub enrollment_service:
        EnrollmentService<SurrealCourseRepository<C>, SurrealEnrollmentRepository<C>>,
    auth_config: AuthConfig,
}

impl<C: Connection> AppState<C> {
    pub fn new(db: Surreal<C>, auth_config: AuthConfig) -> Arc<Self> {
        let users = match &auth_config.pepper {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
            None => SurrealUserRepository::new(db.clone()),
        };
        let sessions = SurrealAuthSessionRepository::new(db.clone());
        let courses = SurrealCourseRepository::new(db.clone());
        let enrollments = SurrealEnrollmentRepository::new(db.clone());

        Arc::new(Self {
            users: users.clone(),
            courses: courses.clone(),
            lectures: SurrealLectureRepository::new(db.clone()),
            assignments: SurrealAssignmentRepository::new(db.clone()),
            submissions: SurrealSubmissionRepository::new(db.clone()),
            live_sessions: SurrealLiveSessionRepository::new(db.clone()),
            enrollments: enrollments.clone(),
            chat: SurrealChatMessageRepository::new(db.clone()),
            auth: AuthService::new(users, sessions, auth_config.clone()),
            evaluator: AccessEvaluator::new(
                SurrealResourceCatalog::new(db.clone()),
                enrollments.clone(),
            ),
            enrollment_service: EnrollmentService::new(courses, enrollments),
            auth_config,
        })
    }

    /// Resolve the per-request actor from the `Authorization` header.
    ///
    /// No header means an anonymous guest. A header that is present
    /// but unverifiable is rejected outright — a stale token should
    /// surface as 401 so the client refreshes, not silently downgrade
    /// to guest visibility.
    pub fn actor(&self, headers: &HeaderMap) -> Result<Actor, ApiError> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(Actor::Guest);
        };
        let raw = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = token::decode_access_token(raw, &self.auth_config)
            .map_err(|_| ApiError::Unauthorized)?;
        claims.actor().map_err(|_| ApiError::Unauthorized)
    }

    /// Like [`AppState::actor`], but guests are rejected.
    pub fn require_user(&self, headers: &HeaderMap) -> Result<Actor, ApiError> {
        match self.actor(headers)? {
            Actor::Guest => Err(ApiError::Unauthorized),
            actor => Ok(actor),
        }
    }
}
