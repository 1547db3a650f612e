//! Migration runner tests against in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn mem_db() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db
}

#[tokio::test]
async fn migrations_apply_cleanly() {
    let db = mem_db().await;
    campus_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = mem_db().await;
    campus_db::run_migrations(&db).await.unwrap();
    // Second run must be a no-op, not a failure.
    campus_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn schema_v1_defines_all_tables() {
    let ddl = campus_db::schema_v1();
    for table in [
        "user",
        "course",
        "lecture",
        "assignment",
        "submission",
        "live_session",
        "enrollment",
        "chat_message",
        "auth_session",
    ] {
        assert!(
            ddl.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
            "missing table definition: {table}"
        );
    }
}
