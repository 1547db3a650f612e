//! End-to-end access flows over real repositories: the evaluator and
//! the enrollment service wired to in-memory SurrealDB.

use campus_core::access::{AccessEvaluator, Decision};
use campus_core::enrollment::EnrollmentService;
use campus_core::error::CampusError;
use campus_core::models::actor::{Actor, Role};
use campus_core::models::course::CreateCourse;
use campus_core::models::lecture::CreateLecture;
use campus_core::models::resource::ResourceKind;
use campus_core::repository::{CourseRepository, LectureRepository};
use campus_db::repository::{
    SurrealCourseRepository, SurrealEnrollmentRepository, SurrealLectureRepository,
    SurrealResourceCatalog,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Evaluator = AccessEvaluator<SurrealResourceCatalog<Db>, SurrealEnrollmentRepository<Db>>;
type Enroller = EnrollmentService<SurrealCourseRepository<Db>, SurrealEnrollmentRepository<Db>>;

async fn setup() -> (Surreal<Db>, Evaluator, Enroller) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();

    let evaluator = AccessEvaluator::new(
        SurrealResourceCatalog::new(db.clone()),
        SurrealEnrollmentRepository::new(db.clone()),
    );
    let enroller = EnrollmentService::new(
        SurrealCourseRepository::new(db.clone()),
        SurrealEnrollmentRepository::new(db.clone()),
    );
    (db, evaluator, enroller)
}

/// Create a course (optionally published) with one lecture; returns
/// (course_id, lecture_id).
async fn seed_course(
    db: &Surreal<Db>,
    instructor_id: Uuid,
    published: bool,
) -> (Uuid, Uuid) {
    let courses = SurrealCourseRepository::new(db.clone());
    let course = courses
        .create(CreateCourse {
            instructor_id,
            title: "Compilers".into(),
            description: "Parsing and codegen".into(),
            tags: vec![],
        })
        .await
        .unwrap();
    if published {
        courses.publish(course.id).await.unwrap();
    }

    let lectures = SurrealLectureRepository::new(db.clone());
    let lecture = lectures
        .create(CreateLecture {
            course_id: course.id,
            title: "Lexing".into(),
            video_url: Some("https://video.example/lexing".into()),
            position: 0,
        })
        .await
        .unwrap();

    (course.id, lecture.id)
}

#[tokio::test]
async fn enroll_then_access_scenario() {
    let (db, evaluator, enroller) = setup().await;
    let student = Actor::user(Uuid::new_v4(), Role::Student);
    let (course_id, lecture_id) = seed_course(&db, Uuid::new_v4(), true).await;

    // No enrollment record yet.
    let before = evaluator
        .can_access_id(&student, ResourceKind::Lecture, lecture_id)
        .await
        .unwrap();
    assert_eq!(before, Decision::NotEnrolled);

    enroller
        .enroll(student.id().unwrap(), course_id)
        .await
        .unwrap();

    // Immediately visible — decisions are computed fresh per request.
    let after = evaluator
        .can_access_id(&student, ResourceKind::Lecture, lecture_id)
        .await
        .unwrap();
    assert_eq!(after, Decision::Allow);
}

#[tokio::test]
async fn double_enroll_is_idempotent() {
    let (db, _evaluator, enroller) = setup().await;
    let student_id = Uuid::new_v4();
    let (course_id, _) = seed_course(&db, Uuid::new_v4(), true).await;

    let first = enroller.enroll(student_id, course_id).await.unwrap();
    let second = enroller.enroll(student_id, course_id).await.unwrap();

    // Same record both times, not an error and not a second record.
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn enrolling_in_a_draft_course_fails_typed() {
    let (db, _evaluator, enroller) = setup().await;
    let (course_id, _) = seed_course(&db, Uuid::new_v4(), false).await;

    let result = enroller.enroll(Uuid::new_v4(), course_id).await;
    assert!(matches!(
        result,
        Err(CampusError::CourseNotPublished { .. })
    ));
}

#[tokio::test]
async fn enrolling_in_a_missing_course_fails_typed() {
    let (_db, _evaluator, enroller) = setup().await;

    let result = enroller.enroll(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(CampusError::NotFound { .. })));
}

#[tokio::test]
async fn unpublished_course_reads_as_missing_to_outsiders() {
    let (db, evaluator, _enroller) = setup().await;
    let student = Actor::user(Uuid::new_v4(), Role::Student);
    let instructor_id = Uuid::new_v4();
    let (course_id, lecture_id) = seed_course(&db, instructor_id, false).await;

    let draft = evaluator
        .can_access_id(&student, ResourceKind::Lecture, lecture_id)
        .await
        .unwrap();
    let missing = evaluator
        .can_access_id(&student, ResourceKind::Lecture, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(draft, missing, "drafts must be indistinguishable");

    // The owner still sees it.
    let owner = Actor::user(instructor_id, Role::Instructor);
    let decision = evaluator
        .can_access_course(&owner, course_id)
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn instructor_bypass_ignores_enrollment_state() {
    let (db, evaluator, _enroller) = setup().await;
    let instructor_id = Uuid::new_v4();
    let (_course_id, lecture_id) = seed_course(&db, instructor_id, true).await;

    let owner = Actor::user(instructor_id, Role::Instructor);
    let decision = evaluator
        .can_access_id(&owner, ResourceKind::Lecture, lecture_id)
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);

    // A foreign instructor holds no bypass and no enrollment.
    let foreign = Actor::user(Uuid::new_v4(), Role::Instructor);
    let decision = evaluator
        .can_access_id(&foreign, ResourceKind::Lecture, lecture_id)
        .await
        .unwrap();
    assert_eq!(decision, Decision::NotEnrolled);
}

#[tokio::test]
async fn admin_sees_everything() {
    let (db, evaluator, _enroller) = setup().await;
    let admin = Actor::user(Uuid::new_v4(), Role::Admin);

    let (_published, lecture_a) = seed_course(&db, Uuid::new_v4(), true).await;
    let (_draft, lecture_b) = seed_course(&db, Uuid::new_v4(), false).await;

    for lecture_id in [lecture_a, lecture_b] {
        let decision = evaluator
            .can_access_id(&admin, ResourceKind::Lecture, lecture_id)
            .await
            .unwrap();
        assert_eq!(decision, Decision::Allow);
    }
}

#[tokio::test]
async fn assignments_and_live_sessions_share_the_course_gate() {
    use campus_core::models::assignment::CreateAssignment;
    use campus_core::models::live_session::CreateLiveSession;
    use campus_core::repository::{AssignmentRepository, LiveSessionRepository};
    use campus_db::repository::{SurrealAssignmentRepository, SurrealLiveSessionRepository};

    let (db, evaluator, enroller) = setup().await;
    let student = Actor::user(Uuid::new_v4(), Role::Student);
    let (course_id, _) = seed_course(&db, Uuid::new_v4(), true).await;

    let assignment = SurrealAssignmentRepository::new(db.clone())
        .create(CreateAssignment {
            course_id,
            title: "Build a parser".into(),
            description: "".into(),
            due_at: None,
        })
        .await
        .unwrap();
    let session = SurrealLiveSessionRepository::new(db.clone())
        .create(CreateLiveSession {
            course_id,
            title: "Office hours".into(),
            start_at: chrono::Utc::now(),
            meet_url: "https://meet.example/xyz".into(),
        })
        .await
        .unwrap();

    for (kind, id) in [
        (ResourceKind::Assignment, assignment.id),
        (ResourceKind::LiveSession, session.id),
    ] {
        let decision = evaluator.can_access_id(&student, kind, id).await.unwrap();
        assert_eq!(decision, Decision::NotEnrolled);
    }

    enroller
        .enroll(student.id().unwrap(), course_id)
        .await
        .unwrap();

    for (kind, id) in [
        (ResourceKind::Assignment, assignment.id),
        (ResourceKind::LiveSession, session.id),
    ] {
        let decision = evaluator.can_access_id(&student, kind, id).await.unwrap();
        assert_eq!(decision, Decision::Allow);
    }
}
