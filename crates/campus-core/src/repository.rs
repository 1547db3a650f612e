//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Read paths are side-effect
//! free and safe to call concurrently; the only mutating operation
//! with a cross-request invariant is `EnrollmentRepository::insert`,
//! whose at-most-once guarantee rests on a storage-level unique index.

use uuid::Uuid;

use crate::error::CampusResult;
use crate::models::{
    assignment::{Assignment, CreateAssignment},
    chat::{ChatMessage, CreateChatMessage},
    course::{Course, CreateCourse, UpdateCourse},
    enrollment::{CreateEnrollment, EnrollmentRecord},
    lecture::{CreateLecture, Lecture},
    live_session::{CreateLiveSession, LiveSession},
    resource::{ProtectedResource, ResourceKind},
    session::{AuthSession, CreateAuthSession},
    submission::{CreateSubmission, Submission},
    user::{CreateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Accounts & sessions
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = CampusResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CampusResult<User>> + Send;
}

pub trait AuthSessionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateAuthSession,
    ) -> impl Future<Output = CampusResult<AuthSession>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = CampusResult<AuthSession>> + Send;
    /// Invalidate a single session (logout / refresh rotation).
    fn invalidate(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    /// Invalidate all sessions for a user (e.g., on password change).
    fn invalidate_user_sessions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = CampusResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Courses & content
// ---------------------------------------------------------------------------

pub trait CourseRepository: Send + Sync {
    fn create(&self, input: CreateCourse) -> impl Future<Output = CampusResult<Course>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Course>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCourse,
    ) -> impl Future<Output = CampusResult<Course>> + Send;
    /// Flip the course to published. Idempotent.
    fn publish(&self, id: Uuid) -> impl Future<Output = CampusResult<Course>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list_published(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Course>>> + Send;
    /// All courses owned by an instructor, drafts included.
    fn list_by_instructor(
        &self,
        instructor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Course>>> + Send;
    /// Every course regardless of state. Admin moderation only.
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Course>>> + Send;
}

pub trait LectureRepository: Send + Sync {
    fn create(&self, input: CreateLecture) -> impl Future<Output = CampusResult<Lecture>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Lecture>> + Send;
    fn list_by_course(
        &self,
        course_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<Lecture>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Lecture>>> + Send;
}

pub trait AssignmentRepository: Send + Sync {
    fn create(
        &self,
        input: CreateAssignment,
    ) -> impl Future<Output = CampusResult<Assignment>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Assignment>> + Send;
    fn list_by_course(
        &self,
        course_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<Assignment>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Assignment>>> + Send;
}

pub trait SubmissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSubmission,
    ) -> impl Future<Output = CampusResult<Submission>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Submission>> + Send;
    fn list_by_assignment(
        &self,
        assignment_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<Submission>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Submission>>> + Send;
}

pub trait LiveSessionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateLiveSession,
    ) -> impl Future<Output = CampusResult<LiveSession>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<LiveSession>> + Send;
    fn list_by_course(
        &self,
        course_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<LiveSession>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<LiveSession>>> + Send;
}

// ---------------------------------------------------------------------------
// Enrollment index
// ---------------------------------------------------------------------------

pub trait EnrollmentRepository: Send + Sync {
    /// Insert a new record. The storage layer enforces uniqueness of
    /// (student_id, course_id) atomically; a duplicate insert fails with
    /// `CampusError::AlreadyExists` rather than racing a read-then-write.
    fn insert(
        &self,
        input: CreateEnrollment,
    ) -> impl Future<Output = CampusResult<EnrollmentRecord>> + Send;
    fn get_by_pair(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> impl Future<Output = CampusResult<EnrollmentRecord>> + Send;
    /// Absence of a record means `false`.
    fn is_enrolled(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> impl Future<Output = CampusResult<bool>> + Send;
    fn list_by_student(
        &self,
        student_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<EnrollmentRecord>>> + Send;
    /// Admin moderation only — no student-facing unenroll exists.
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<EnrollmentRecord>>> + Send;
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

pub trait ChatMessageRepository: Send + Sync {
    fn create(
        &self,
        input: CreateChatMessage,
    ) -> impl Future<Output = CampusResult<ChatMessage>> + Send;
    fn list_by_course(
        &self,
        course_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<ChatMessage>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<ChatMessage>>> + Send;
}

// ---------------------------------------------------------------------------
// Resource catalog
// ---------------------------------------------------------------------------

/// Read-only lookup shape the access evaluator depends on. No caching
/// or invalidation — decisions are computed fresh per request.
pub trait ResourceCatalog: Send + Sync {
    fn resource_by_id(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> impl Future<Output = CampusResult<ProtectedResource>> + Send;
    fn course_of(
        &self,
        resource: &ProtectedResource,
    ) -> impl Future<Output = CampusResult<Course>> + Send;
    fn course_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Course>> + Send;
}
