//! SurrealDB-backed [`ResourceCatalog`].
//!
//! Pure lookup composition over the content repositories — the shape
//! the access evaluator depends on. No caching: catalog freshness is
//! not a contended concern at this system's scale.

use campus_core::error::CampusResult;
use campus_core::models::course::Course;
use campus_core::models::resource::{ProtectedResource, ResourceKind};
use campus_core::repository::{
    AssignmentRepository, CourseRepository, LectureRepository, LiveSessionRepository,
    ResourceCatalog,
};
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use super::{
    SurrealAssignmentRepository, SurrealCourseRepository, SurrealLectureRepository,
    SurrealLiveSessionRepository,
};

/// SurrealDB implementation of the Resource catalog.
#[derive(Clone)]
pub struct SurrealResourceCatalog<C: Connection> {
    courses: SurrealCourseRepository<C>,
    lectures: SurrealLectureRepository<C>,
    assignments: SurrealAssignmentRepository<C>,
    live_sessions: SurrealLiveSessionRepository<C>,
}

impl<C: Connection> SurrealResourceCatalog<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            courses: SurrealCourseRepository::new(db.clone()),
            lectures: SurrealLectureRepository::new(db.clone()),
            assignments: SurrealAssignmentRepository::new(db.clone()),
            live_sessions: SurrealLiveSessionRepository::new(db),
        }
    }
}

impl<C: Connection> ResourceCatalog for SurrealResourceCatalog<C> {
    async fn resource_by_id(&self, kind: ResourceKind, id: Uuid) -> CampusResult<ProtectedResource> {
        match kind {
            ResourceKind::Lecture => self
                .lectures
                .get_by_id(id)
                .await
                .map(ProtectedResource::Lecture),
            ResourceKind::Assignment => self
                .assignments
                .get_by_id(id)
                .await
                .map(ProtectedResource::Assignment),
            ResourceKind::LiveSession => self
                .live_sessions
                .get_by_id(id)
                .await
                .map(ProtectedResource::LiveSession),
        }
    }

    async fn course_of(&self, resource: &ProtectedResource) -> CampusResult<Course> {
        self.courses.get_by_id(resource.course_id()).await
    }

    async fn course_by_id(&self, id: Uuid) -> CampusResult<Course> {
        self.courses.get_by_id(id).await
    }
}
