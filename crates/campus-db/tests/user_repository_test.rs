//! Integration tests for the User repository using in-memory
//! SurrealDB.

use campus_core::error::CampusError;
use campus_core::models::actor::Role;
use campus_core::models::user::CreateUser;
use campus_core::repository::UserRepository;
use campus_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();
    db
}

fn input(email: &str, role: Role) -> CreateUser {
    CreateUser {
        name: "Alice".into(),
        email: email.into(),
        password: "correct-horse-battery".into(),
        role,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(input("alice@example.com", Role::Student))
        .await
        .unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, Role::Student);

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(input("bob@example.com", Role::Instructor))
        .await
        .unwrap();

    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(
        user.password_hash.starts_with("$argon2id$"),
        "expected an Argon2id PHC hash, got {}",
        user.password_hash
    );
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(input("carol@example.com", Role::Student))
        .await
        .unwrap();

    let second = repo.create(input("carol@example.com", Role::Instructor)).await;
    assert!(
        matches!(second, Err(CampusError::AlreadyExists { .. })),
        "duplicate email must surface as AlreadyExists, got {second:?}"
    );
}

#[tokio::test]
async fn unknown_email_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let result = repo.get_by_email("nobody@example.com").await;
    assert!(matches!(result, Err(CampusError::NotFound { .. })));
}
