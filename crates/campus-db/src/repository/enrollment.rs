//! SurrealDB implementation of [`EnrollmentRepository`].
//!
//! The uniqueness of (student_id, course_id) is enforced by the
//! `idx_enrollment_pair` UNIQUE index: concurrent duplicate enrolls
//! race at the storage layer and exactly one insert wins. The loser
//! surfaces as `AlreadyExists`, which the enrollment service turns
//! into an idempotent success.

use campus_core::error::CampusResult;
use campus_core::models::enrollment::{CreateEnrollment, EnrollmentRecord};
use campus_core::repository::{EnrollmentRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct EnrollmentRow {
    student_id: String,
    course_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct EnrollmentRowWithId {
    record_id: String,
    student_id: String,
    course_id: String,
    created_at: DateTime<Utc>,
}

impl EnrollmentRow {
    fn into_record(self, id: Uuid) -> Result<EnrollmentRecord, DbError> {
        let student_id = Uuid::parse_str(&self.student_id)
            .map_err(|e| DbError::Decode(format!("invalid student UUID: {e}")))?;
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(EnrollmentRecord {
            id,
            student_id,
            course_id,
            created_at: self.created_at,
        })
    }
}

impl EnrollmentRowWithId {
    fn try_into_record(self) -> Result<EnrollmentRecord, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let student_id = Uuid::parse_str(&self.student_id)
            .map_err(|e| DbError::Decode(format!("invalid student UUID: {e}")))?;
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(EnrollmentRecord {
            id,
            student_id,
            course_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Enrollment repository.
#[derive(Clone)]
pub struct SurrealEnrollmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEnrollmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> EnrollmentRepository for SurrealEnrollmentRepository<C> {
    async fn insert(&self, input: CreateEnrollment) -> CampusResult<EnrollmentRecord> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('enrollment', $id) SET \
                 student_id = $student_id, course_id = $course_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("student_id", input.student_id.to_string()))
            .bind(("course_id", input.course_id.to_string()))
            .await
            .map_err(|e| DbError::on_create("enrollment", e))?;

        // A duplicate (student, course) pair is rejected by the unique
        // index inside this single statement — there is no
        // read-then-write window to race through.
        let mut result = result
            .check()
            .map_err(|e| DbError::on_create("enrollment", e))?;

        let rows: Vec<EnrollmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "enrollment".into(),
            id: id_str,
        })?;

        Ok(row.into_record(id)?)
    }

    async fn get_by_pair(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> CampusResult<EnrollmentRecord> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM enrollment \
                 WHERE student_id = $student_id AND course_id = $course_id",
            )
            .bind(("student_id", student_id.to_string()))
            .bind(("course_id", course_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EnrollmentRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "enrollment".into(),
            id: format!("student={student_id} course={course_id}"),
        })?;

        Ok(row.try_into_record()?)
    }

    async fn is_enrolled(&self, student_id: Uuid, course_id: Uuid) -> CampusResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM enrollment \
                 WHERE student_id = $student_id AND course_id = $course_id \
                 GROUP ALL",
            )
            .bind(("student_id", student_id.to_string()))
            .bind(("course_id", course_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn list_by_student(&self, student_id: Uuid) -> CampusResult<Vec<EnrollmentRecord>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM enrollment \
                 WHERE student_id = $student_id \
                 ORDER BY created_at ASC",
            )
            .bind(("student_id", student_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EnrollmentRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_record())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('enrollment', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<EnrollmentRecord>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM enrollment GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM enrollment \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EnrollmentRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_record())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
