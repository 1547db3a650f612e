//! SurrealDB implementation of [`LectureRepository`].

use campus_core::error::CampusResult;
use campus_core::models::lecture::{CreateLecture, Lecture};
use campus_core::repository::{LectureRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct LectureRow {
    course_id: String,
    title: String,
    video_url: Option<String>,
    position: u32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct LectureRowWithId {
    record_id: String,
    course_id: String,
    title: String,
    video_url: Option<String>,
    position: u32,
    created_at: DateTime<Utc>,
}

impl LectureRow {
    fn into_lecture(self, id: Uuid) -> Result<Lecture, DbError> {
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(Lecture {
            id,
            course_id,
            title: self.title,
            video_url: self.video_url,
            position: self.position,
            created_at: self.created_at,
        })
    }
}

impl LectureRowWithId {
    fn try_into_lecture(self) -> Result<Lecture, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(Lecture {
            id,
            course_id,
            title: self.title,
            video_url: self.video_url,
            position: self.position,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Lecture repository.
#[derive(Clone)]
pub struct SurrealLectureRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLectureRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> LectureRepository for SurrealLectureRepository<C> {
    async fn create(&self, input: CreateLecture) -> CampusResult<Lecture> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('lecture', $id) SET \
                 course_id = $course_id, title = $title, \
                 video_url = $video_url, position = $position",
            )
            .bind(("id", id_str.clone()))
            .bind(("course_id", input.course_id.to_string()))
            .bind(("title", input.title))
            .bind(("video_url", input.video_url))
            .bind(("position", input.position))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::on_create("lecture", e))?;

        let rows: Vec<LectureRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lecture".into(),
            id: id_str,
        })?;

        Ok(row.into_lecture(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Lecture> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('lecture', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LectureRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lecture".into(),
            id: id_str,
        })?;

        Ok(row.into_lecture(id)?)
    }

    async fn list_by_course(&self, course_id: Uuid) -> CampusResult<Vec<Lecture>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM lecture \
                 WHERE course_id = $course_id \
                 ORDER BY position ASC",
            )
            .bind(("course_id", course_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LectureRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_lecture())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('lecture', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<Lecture>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM lecture GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM lecture \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LectureRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_lecture())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
