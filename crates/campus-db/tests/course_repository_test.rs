//! Integration tests for the Course repository using in-memory
//! SurrealDB.

use campus_core::models::course::{CreateCourse, UpdateCourse};
use campus_core::repository::{CourseRepository, Pagination};
use campus_db::repository::SurrealCourseRepository;
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

fn input(instructor_id: Uuid, title: &str) -> CreateCourse {
    CreateCourse {
        instructor_id,
        title: title.into(),
        description: "A course".into(),
        tags: vec!["rust".into()],
    }
}

#[tokio::test]
async fn create_and_get_course() {
    let db = setup().await;
    let repo = SurrealCourseRepository::new(db);
    let instructor_id = Uuid::new_v4();

    let course = repo
        .create(input(instructor_id, "Operating Systems"))
        .await
        .unwrap();

    assert_eq!(course.instructor_id, instructor_id);
    assert_eq!(course.title, "Operating Systems");
    assert!(!course.published, "new courses start as drafts");

    let fetched = repo.get_by_id(course.id).await.unwrap();
    assert_eq!(fetched.id, course.id);
    assert_eq!(fetched.tags, vec!["rust".to_string()]);
}

#[tokio::test]
async fn update_course() {
    let db = setup().await;
    let repo = SurrealCourseRepository::new(db);

    let course = repo
        .create(input(Uuid::new_v4(), "Before"))
        .await
        .unwrap();

    let updated = repo
        .update(
            course.id,
            UpdateCourse {
                title: Some("After".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, course.id);
    assert_eq!(updated.title, "After");
    assert_eq!(updated.description, "A course"); // unchanged
    assert!(updated.updated_at >= course.updated_at);
}

#[tokio::test]
async fn publish_is_idempotent() {
    let db = setup().await;
    let repo = SurrealCourseRepository::new(db);

    let course = repo.create(input(Uuid::new_v4(), "Draft")).await.unwrap();

    let published = repo.publish(course.id).await.unwrap();
    assert!(published.published);

    let again = repo.publish(course.id).await.unwrap();
    assert!(again.published);
}

#[tokio::test]
async fn delete_course() {
    let db = setup().await;
    let repo = SurrealCourseRepository::new(db);

    let course = repo
        .create(input(Uuid::new_v4(), "Ephemeral"))
        .await
        .unwrap();

    repo.delete(course.id).await.unwrap();

    let result = repo.get_by_id(course.id).await;
    assert!(result.is_err(), "should not find deleted course");
}

#[tokio::test]
async fn list_published_excludes_drafts() {
    let db = setup().await;
    let repo = SurrealCourseRepository::new(db);
    let instructor_id = Uuid::new_v4();

    let a = repo.create(input(instructor_id, "Course A")).await.unwrap();
    repo.create(input(instructor_id, "Course B")).await.unwrap();
    repo.publish(a.id).await.unwrap();

    let listed = repo.list_published(Pagination::default()).await.unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].id, a.id);

    // The full listing still sees both.
    let all = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(all.total, 2);
}

#[tokio::test]
async fn list_by_instructor_is_scoped_and_includes_drafts() {
    let db = setup().await;
    let repo = SurrealCourseRepository::new(db);

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    for i in 0..3 {
        repo.create(input(alice, &format!("Alice {i}"))).await.unwrap();
    }
    repo.create(input(bob, "Bob 0")).await.unwrap();

    let mine = repo
        .list_by_instructor(alice, Pagination::default())
        .await
        .unwrap();
    assert_eq!(mine.total, 3);
    assert!(mine.items.iter().all(|c| c.instructor_id == alice));
}

#[tokio::test]
async fn list_with_pagination() {
    let db = setup().await;
    let repo = SurrealCourseRepository::new(db);
    let instructor_id = Uuid::new_v4();

    for i in 0..5 {
        let course = repo
            .create(input(instructor_id, &format!("Course {i}")))
            .await
            .unwrap();
        repo.publish(course.id).await.unwrap();
    }

    let page1 = repo
        .list_published(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();
    assert_eq!(page1.items.len(), 3);
    assert_eq!(page1.total, 5);

    let page2 = repo
        .list_published(Pagination {
            offset: 3,
            limit: 3,
        })
        .await
        .unwrap();
    assert_eq!(page2.items.len(), 2);
    assert_eq!(page2.total, 5);
}
