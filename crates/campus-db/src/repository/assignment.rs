//! SurrealDB implementation of [`AssignmentRepository`].

use campus_core::error::CampusResult;
use campus_core::models::assignment::{Assignment, CreateAssignment};
use campus_core::repository::{AssignmentRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AssignmentRow {
    course_id: String,
    title: String,
    description: String,
    due_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AssignmentRowWithId {
    record_id: String,
    course_id: String,
    title: String,
    description: String,
    due_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl AssignmentRow {
    fn into_assignment(self, id: Uuid) -> Result<Assignment, DbError> {
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(Assignment {
            id,
            course_id,
            title: self.title,
            description: self.description,
            due_at: self.due_at,
            created_at: self.created_at,
        })
    }
}

impl AssignmentRowWithId {
    fn try_into_assignment(self) -> Result<Assignment, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(Assignment {
            id,
            course_id,
            title: self.title,
            description: self.description,
            due_at: self.due_at,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Assignment repository.
#[derive(Clone)]
pub struct SurrealAssignmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAssignmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AssignmentRepository for SurrealAssignmentRepository<C> {
    async fn create(&self, input: CreateAssignment) -> CampusResult<Assignment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('assignment', $id) SET \
                 course_id = $course_id, title = $title, \
                 description = $description, due_at = $due_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("course_id", input.course_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("due_at", input.due_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::on_create("assignment", e))?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "assignment".into(),
            id: id_str,
        })?;

        Ok(row.into_assignment(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Assignment> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('assignment', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "assignment".into(),
            id: id_str,
        })?;

        Ok(row.into_assignment(id)?)
    }

    async fn list_by_course(&self, course_id: Uuid) -> CampusResult<Vec<Assignment>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM assignment \
                 WHERE course_id = $course_id \
                 ORDER BY created_at ASC",
            )
            .bind(("course_id", course_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_assignment())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('assignment', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<Assignment>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM assignment GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM assignment \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_assignment())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
