//! Tests for the async evaluation shell using in-memory fakes.
//!
//! The pure decision function has its own unit tests; these cover the
//! lookup orchestration around it: missing-resource handling, when
//! the enrollment index is consulted, and the end-to-end
//! enroll-then-access behavior.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use campus_core::access::{AccessEvaluator, Decision};
use campus_core::error::{CampusError, CampusResult};
use campus_core::models::actor::{Actor, Role};
use campus_core::models::course::Course;
use campus_core::models::enrollment::{CreateEnrollment, EnrollmentRecord};
use campus_core::models::lecture::Lecture;
use campus_core::models::resource::{ProtectedResource, ResourceKind};
use campus_core::repository::{
    EnrollmentRepository, PaginatedResult, Pagination, ResourceCatalog,
};
use chrono::Utc;
use uuid::Uuid;

struct FakeCatalog {
    courses: HashMap<Uuid, Course>,
    lectures: HashMap<Uuid, Lecture>,
}

fn not_found(entity: &str, id: impl ToString) -> CampusError {
    CampusError::NotFound {
        entity: entity.into(),
        id: id.to_string(),
    }
}

impl ResourceCatalog for FakeCatalog {
    async fn resource_by_id(&self, kind: ResourceKind, id: Uuid) -> CampusResult<ProtectedResource> {
        match kind {
            ResourceKind::Lecture => self
                .lectures
                .get(&id)
                .cloned()
                .map(ProtectedResource::Lecture)
                .ok_or_else(|| not_found("lecture", id)),
            _ => Err(not_found(kind.as_str(), id)),
        }
    }

    async fn course_of(&self, resource: &ProtectedResource) -> CampusResult<Course> {
        self.course_by_id(resource.course_id()).await
    }

    async fn course_by_id(&self, id: Uuid) -> CampusResult<Course> {
        self.courses
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("course", id))
    }
}

/// Enrollment index fake that counts `is_enrolled` lookups.
#[derive(Default)]
struct FakeIndex {
    pairs: Mutex<HashSet<(Uuid, Uuid)>>,
    lookups: AtomicUsize,
}

impl FakeIndex {
    fn enroll(&self, student_id: Uuid, course_id: Uuid) {
        self.pairs.lock().unwrap().insert((student_id, course_id));
    }

    fn record(student_id: Uuid, course_id: Uuid) -> EnrollmentRecord {
        EnrollmentRecord {
            id: Uuid::new_v4(),
            student_id,
            course_id,
            created_at: Utc::now(),
        }
    }
}

impl EnrollmentRepository for &FakeIndex {
    async fn insert(&self, input: CreateEnrollment) -> CampusResult<EnrollmentRecord> {
        let mut pairs = self.pairs.lock().unwrap();
        if !pairs.insert((input.student_id, input.course_id)) {
            return Err(CampusError::AlreadyExists {
                entity: "enrollment".into(),
            });
        }
        Ok(FakeIndex::record(input.student_id, input.course_id))
    }

    async fn get_by_pair(&self, student_id: Uuid, course_id: Uuid) -> CampusResult<EnrollmentRecord> {
        if self.pairs.lock().unwrap().contains(&(student_id, course_id)) {
            Ok(FakeIndex::record(student_id, course_id))
        } else {
            Err(not_found("enrollment", student_id))
        }
    }

    async fn is_enrolled(&self, student_id: Uuid, course_id: Uuid) -> CampusResult<bool> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.pairs.lock().unwrap().contains(&(student_id, course_id)))
    }

    async fn list_by_student(&self, _student_id: Uuid) -> CampusResult<Vec<EnrollmentRecord>> {
        Ok(vec![])
    }

    async fn delete(&self, _id: Uuid) -> CampusResult<()> {
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<EnrollmentRecord>> {
        Ok(PaginatedResult {
            items: vec![],
            total: 0,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

fn course(id: Uuid, instructor_id: Uuid, published: bool) -> Course {
    Course {
        id,
        instructor_id,
        title: "Distributed Systems".into(),
        description: "".into(),
        tags: vec![],
        published,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn lecture(id: Uuid, course_id: Uuid) -> Lecture {
    Lecture {
        id,
        course_id,
        title: "Consensus".into(),
        video_url: Some("https://video.example/abc".into()),
        position: 0,
        created_at: Utc::now(),
    }
}

struct World {
    catalog: FakeCatalog,
    index: FakeIndex,
    course_id: Uuid,
    draft_course_id: Uuid,
    instructor_id: Uuid,
    lecture_id: Uuid,
    draft_lecture_id: Uuid,
}

fn world() -> World {
    let course_id = Uuid::new_v4();
    let draft_course_id = Uuid::new_v4();
    let instructor_id = Uuid::new_v4();
    let lecture_id = Uuid::new_v4();
    let draft_lecture_id = Uuid::new_v4();

    let mut courses = HashMap::new();
    courses.insert(course_id, course(course_id, instructor_id, true));
    courses.insert(draft_course_id, course(draft_course_id, instructor_id, false));

    let mut lectures = HashMap::new();
    lectures.insert(lecture_id, lecture(lecture_id, course_id));
    lectures.insert(draft_lecture_id, lecture(draft_lecture_id, draft_course_id));

    World {
        catalog: FakeCatalog { courses, lectures },
        index: FakeIndex::default(),
        course_id,
        draft_course_id,
        instructor_id,
        lecture_id,
        draft_lecture_id,
    }
}

#[tokio::test]
async fn enroll_then_access() {
    let w = world();
    let evaluator = AccessEvaluator::new(w.catalog, &w.index);
    let student = Actor::user(Uuid::new_v4(), Role::Student);

    let before = evaluator
        .can_access_id(&student, ResourceKind::Lecture, w.lecture_id)
        .await
        .unwrap();
    assert_eq!(before, Decision::NotEnrolled);

    w.index.enroll(student.id().unwrap(), w.course_id);

    let after = evaluator
        .can_access_id(&student, ResourceKind::Lecture, w.lecture_id)
        .await
        .unwrap();
    assert_eq!(after, Decision::Allow);
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    let w = world();
    let evaluator = AccessEvaluator::new(w.catalog, &w.index);
    let student = Actor::user(Uuid::new_v4(), Role::Student);

    let decision = evaluator
        .can_access_id(&student, ResourceKind::Lecture, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(decision, Decision::NotFound);
}

#[tokio::test]
async fn resource_in_draft_course_matches_missing_resource() {
    let w = world();
    let draft_lecture_id = w.draft_lecture_id;
    let evaluator = AccessEvaluator::new(w.catalog, &w.index);
    let student = Actor::user(Uuid::new_v4(), Role::Student);

    let draft = evaluator
        .can_access_id(&student, ResourceKind::Lecture, draft_lecture_id)
        .await
        .unwrap();
    let missing = evaluator
        .can_access_id(&student, ResourceKind::Lecture, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(draft, missing);
}

#[tokio::test]
async fn instructor_and_admin_skip_the_enrollment_index() {
    let w = world();
    let instructor = Actor::user(w.instructor_id, Role::Instructor);
    let admin = Actor::user(Uuid::new_v4(), Role::Admin);
    let lecture_id = w.lecture_id;
    let draft_course_id = w.draft_course_id;
    let evaluator = AccessEvaluator::new(w.catalog, &w.index);

    let decision = evaluator
        .can_access_id(&instructor, ResourceKind::Lecture, lecture_id)
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);

    let decision = evaluator
        .can_access_course(&admin, draft_course_id)
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);

    // Neither decision needed an enrollment lookup.
    assert_eq!(w.index.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn guest_is_denied_without_an_index_lookup() {
    let w = world();
    let course_id = w.course_id;
    let evaluator = AccessEvaluator::new(w.catalog, &w.index);

    let decision = evaluator
        .can_access_course(&Actor::Guest, course_id)
        .await
        .unwrap();
    assert_eq!(decision, Decision::NotEnrolled);
    assert_eq!(w.index.lookups.load(Ordering::SeqCst), 0);
}
