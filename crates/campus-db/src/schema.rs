//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. The enrollment table's unique
//! index on (student_id, course_id) is the storage-level guarantee
//! that at most one record exists per pair, even under concurrent
//! duplicate enrolls.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['Student', 'Instructor', 'Admin'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Courses
-- =======================================================================
DEFINE TABLE course SCHEMAFULL;
DEFINE FIELD instructor_id ON TABLE course TYPE string;
DEFINE FIELD title ON TABLE course TYPE string;
DEFINE FIELD description ON TABLE course TYPE string;
DEFINE FIELD tags ON TABLE course TYPE array DEFAULT [];
DEFINE FIELD tags.* ON TABLE course TYPE string;
DEFINE FIELD published ON TABLE course TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE course TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE course TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_course_instructor ON TABLE course \
    COLUMNS instructor_id;

-- =======================================================================
-- Lectures
-- =======================================================================
DEFINE TABLE lecture SCHEMAFULL;
DEFINE FIELD course_id ON TABLE lecture TYPE string;
DEFINE FIELD title ON TABLE lecture TYPE string;
DEFINE FIELD video_url ON TABLE lecture TYPE option<string>;
DEFINE FIELD position ON TABLE lecture TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE lecture TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_lecture_course ON TABLE lecture COLUMNS course_id;

-- =======================================================================
-- Assignments
-- =======================================================================
DEFINE TABLE assignment SCHEMAFULL;
DEFINE FIELD course_id ON TABLE assignment TYPE string;
DEFINE FIELD title ON TABLE assignment TYPE string;
DEFINE FIELD description ON TABLE assignment TYPE string;
DEFINE FIELD due_at ON TABLE assignment TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE assignment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_assignment_course ON TABLE assignment \
    COLUMNS course_id;

-- =======================================================================
-- Submissions
-- =======================================================================
DEFINE TABLE submission SCHEMAFULL;
DEFINE FIELD assignment_id ON TABLE submission TYPE string;
DEFINE FIELD course_id ON TABLE submission TYPE string;
DEFINE FIELD student_id ON TABLE submission TYPE string;
DEFINE FIELD file_url ON TABLE submission TYPE string;
DEFINE FIELD submitted_at ON TABLE submission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_submission_assignment ON TABLE submission \
    COLUMNS assignment_id;

-- =======================================================================
-- Live sessions
-- =======================================================================
DEFINE TABLE live_session SCHEMAFULL;
DEFINE FIELD course_id ON TABLE live_session TYPE string;
DEFINE FIELD title ON TABLE live_session TYPE string;
DEFINE FIELD start_at ON TABLE live_session TYPE datetime;
DEFINE FIELD meet_url ON TABLE live_session TYPE string;
DEFINE FIELD created_at ON TABLE live_session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_live_session_course ON TABLE live_session \
    COLUMNS course_id;

-- =======================================================================
-- Enrollments (append-only; at most one per student/course pair)
-- =======================================================================
DEFINE TABLE enrollment SCHEMAFULL;
DEFINE FIELD student_id ON TABLE enrollment TYPE string;
DEFINE FIELD course_id ON TABLE enrollment TYPE string;
DEFINE FIELD created_at ON TABLE enrollment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_enrollment_pair ON TABLE enrollment \
    COLUMNS student_id, course_id UNIQUE;

-- =======================================================================
-- Chat messages (course-scoped)
-- =======================================================================
DEFINE TABLE chat_message SCHEMAFULL;
DEFINE FIELD course_id ON TABLE chat_message TYPE string;
DEFINE FIELD sender_id ON TABLE chat_message TYPE string;
DEFINE FIELD content ON TABLE chat_message TYPE string;
DEFINE FIELD sent_at ON TABLE chat_message TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_chat_message_course ON TABLE chat_message \
    COLUMNS course_id;

-- =======================================================================
-- Auth sessions (refresh tokens)
-- =======================================================================
DEFINE TABLE auth_session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE auth_session TYPE string;
DEFINE FIELD token_hash ON TABLE auth_session TYPE string;
DEFINE FIELD expires_at ON TABLE auth_session TYPE datetime;
DEFINE FIELD created_at ON TABLE auth_session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_auth_session_token ON TABLE auth_session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_auth_session_user ON TABLE auth_session \
    COLUMNS user_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn enrollment_uniqueness_is_storage_enforced() {
        // The at-most-one invariant must live in the schema, not in
        // application code.
        assert!(SCHEMA_V1.contains(
            "DEFINE INDEX idx_enrollment_pair ON TABLE enrollment \
    COLUMNS student_id, course_id UNIQUE"
        ));
    }
}
