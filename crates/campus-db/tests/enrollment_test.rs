//! Integration tests for the Enrollment repository — in particular
//! the storage-enforced at-most-one record per (student, course).

use campus_core::error::CampusError;
use campus_core::models::enrollment::CreateEnrollment;
use campus_core::repository::{EnrollmentRepository, Pagination};
use campus_db::repository::SurrealEnrollmentRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn absence_of_a_record_means_not_enrolled() {
    let db = setup().await;
    let repo = SurrealEnrollmentRepository::new(db);

    let enrolled = repo
        .is_enrolled(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();
    assert!(!enrolled);
}

#[tokio::test]
async fn insert_then_is_enrolled() {
    let db = setup().await;
    let repo = SurrealEnrollmentRepository::new(db);

    let student_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let record = repo
        .insert(CreateEnrollment {
            student_id,
            course_id,
        })
        .await
        .unwrap();
    assert_eq!(record.student_id, student_id);
    assert_eq!(record.course_id, course_id);

    assert!(repo.is_enrolled(student_id, course_id).await.unwrap());
    // A different course is unaffected.
    assert!(!repo.is_enrolled(student_id, Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn duplicate_insert_is_a_typed_conflict() {
    let db = setup().await;
    let repo = SurrealEnrollmentRepository::new(db);

    let student_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    repo.insert(CreateEnrollment {
        student_id,
        course_id,
    })
    .await
    .unwrap();

    let second = repo
        .insert(CreateEnrollment {
            student_id,
            course_id,
        })
        .await;

    assert!(
        matches!(second, Err(CampusError::AlreadyExists { .. })),
        "duplicate pair must surface as AlreadyExists, got {second:?}"
    );
}

#[tokio::test]
async fn concurrent_duplicate_enrolls_leave_exactly_one_record() {
    let db = setup().await;
    let repo = SurrealEnrollmentRepository::new(db);

    let student_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();
    let input = || CreateEnrollment {
        student_id,
        course_id,
    };

    // A student double-clicking "Enroll" from several tabs: all
    // inserts race, the unique index lets exactly one win.
    let (a, b, c, d, e) = tokio::join!(
        repo.insert(input()),
        repo.insert(input()),
        repo.insert(input()),
        repo.insert(input()),
        repo.insert(input()),
    );

    let successes = [a, b, c, d, e].into_iter().filter(Result::is_ok).count();
    assert_eq!(successes, 1, "exactly one concurrent insert may win");

    let all = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(all.total, 1);
    assert_eq!(all.items.len(), 1);
    assert_eq!(all.items[0].student_id, student_id);
}

#[tokio::test]
async fn get_by_pair_returns_the_record() {
    let db = setup().await;
    let repo = SurrealEnrollmentRepository::new(db);

    let student_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let created = repo
        .insert(CreateEnrollment {
            student_id,
            course_id,
        })
        .await
        .unwrap();

    let fetched = repo.get_by_pair(student_id, course_id).await.unwrap();
    assert_eq!(fetched.id, created.id);

    let missing = repo.get_by_pair(student_id, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(CampusError::NotFound { .. })));
}

#[tokio::test]
async fn list_by_student_is_scoped() {
    let db = setup().await;
    let repo = SurrealEnrollmentRepository::new(db);

    let student_a = Uuid::new_v4();
    let student_b = Uuid::new_v4();

    for _ in 0..3 {
        repo.insert(CreateEnrollment {
            student_id: student_a,
            course_id: Uuid::new_v4(),
        })
        .await
        .unwrap();
    }
    repo.insert(CreateEnrollment {
        student_id: student_b,
        course_id: Uuid::new_v4(),
    })
    .await
    .unwrap();

    let a_records = repo.list_by_student(student_a).await.unwrap();
    assert_eq!(a_records.len(), 3);
    let b_records = repo.list_by_student(student_b).await.unwrap();
    assert_eq!(b_records.len(), 1);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let db = setup().await;
    let repo = SurrealEnrollmentRepository::new(db);

    let student_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    let record = repo
        .insert(CreateEnrollment {
            student_id,
            course_id,
        })
        .await
        .unwrap();

    repo.delete(record.id).await.unwrap();
    assert!(!repo.is_enrolled(student_id, course_id).await.unwrap());
}
