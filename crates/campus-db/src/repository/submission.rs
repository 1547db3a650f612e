//! SurrealDB implementation of [`SubmissionRepository`].

use campus_core::error::CampusResult;
use campus_core::models::submission::{CreateSubmission, Submission};
use campus_core::repository::{PaginatedResult, Pagination, SubmissionRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SubmissionRow {
    assignment_id: String,
    course_id: String,
    student_id: String,
    file_url: String,
    submitted_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SubmissionRowWithId {
    record_id: String,
    assignment_id: String,
    course_id: String,
    student_id: String,
    file_url: String,
    submitted_at: DateTime<Utc>,
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

impl SubmissionRow {
    fn into_submission(self, id: Uuid) -> Result<Submission, DbError> {
        Ok(Submission {
            id,
            assignment_id: parse_uuid("assignment", &self.assignment_id)?,
            course_id: parse_uuid("course", &self.course_id)?,
            student_id: parse_uuid("student", &self.student_id)?,
            file_url: self.file_url,
            submitted_at: self.submitted_at,
        })
    }
}

impl SubmissionRowWithId {
    fn try_into_submission(self) -> Result<Submission, DbError> {
        Ok(Submission {
            id: parse_uuid("record", &self.record_id)?,
            assignment_id: parse_uuid("assignment", &self.assignment_id)?,
            course_id: parse_uuid("course", &self.course_id)?,
            student_id: parse_uuid("student", &self.student_id)?,
            file_url: self.file_url,
            submitted_at: self.submitted_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Submission repository.
#[derive(Clone)]
pub struct SurrealSubmissionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSubmissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SubmissionRepository for SurrealSubmissionRepository<C> {
    async fn create(&self, input: CreateSubmission) -> CampusResult<Submission> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('submission', $id) SET \
                 assignment_id = $assignment_id, \
                 course_id = $course_id, \
                 student_id = $student_id, \
                 file_url = $file_url",
            )
            .bind(("id", id_str.clone()))
            .bind(("assignment_id", input.assignment_id.to_string()))
            .bind(("course_id", input.course_id.to_string()))
            .bind(("student_id", input.student_id.to_string()))
            .bind(("file_url", input.file_url))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::on_create("submission", e))?;

        let rows: Vec<SubmissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "submission".into(),
            id: id_str,
        })?;

        Ok(row.into_submission(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Submission> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('submission', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubmissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "submission".into(),
            id: id_str,
        })?;

        Ok(row.into_submission(id)?)
    }

    async fn list_by_assignment(&self, assignment_id: Uuid) -> CampusResult<Vec<Submission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM submission \
                 WHERE assignment_id = $assignment_id \
                 ORDER BY submitted_at ASC",
            )
            .bind(("assignment_id", assignment_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubmissionRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_submission())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('submission', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<Submission>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM submission GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM submission \
                 ORDER BY submitted_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubmissionRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_submission())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
