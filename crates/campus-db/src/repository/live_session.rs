//! SurrealDB implementation of [`LiveSessionRepository`].

use campus_core::error::CampusResult;
use campus_core::models::live_session::{CreateLiveSession, LiveSession};
use campus_core::repository::{LiveSessionRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct LiveSessionRow {
    course_id: String,
    title: String,
    start_at: DateTime<Utc>,
    meet_url: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct LiveSessionRowWithId {
    record_id: String,
    course_id: String,
    title: String,
    start_at: DateTime<Utc>,
    meet_url: String,
    created_at: DateTime<Utc>,
}

impl LiveSessionRow {
    fn into_session(self, id: Uuid) -> Result<LiveSession, DbError> {
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(LiveSession {
            id,
            course_id,
            title: self.title,
            start_at: self.start_at,
            meet_url: self.meet_url,
            created_at: self.created_at,
        })
    }
}

impl LiveSessionRowWithId {
    fn try_into_session(self) -> Result<LiveSession, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        Ok(LiveSession {
            id,
            course_id,
            title: self.title,
            start_at: self.start_at,
            meet_url: self.meet_url,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the LiveSession repository.
#[derive(Clone)]
pub struct SurrealLiveSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLiveSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> LiveSessionRepository for SurrealLiveSessionRepository<C> {
    async fn create(&self, input: CreateLiveSession) -> CampusResult<LiveSession> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('live_session', $id) SET \
                 course_id = $course_id, title = $title, \
                 start_at = $start_at, meet_url = $meet_url",
            )
            .bind(("id", id_str.clone()))
            .bind(("course_id", input.course_id.to_string()))
            .bind(("title", input.title))
            .bind(("start_at", input.start_at))
            .bind(("meet_url", input.meet_url))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::on_create("live_session", e))?;

        let rows: Vec<LiveSessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "live_session".into(),
            id: id_str,
        })?;

        Ok(row.into_session(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<LiveSession> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('live_session', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LiveSessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "live_session".into(),
            id: id_str,
        })?;

        Ok(row.into_session(id)?)
    }

    async fn list_by_course(&self, course_id: Uuid) -> CampusResult<Vec<LiveSession>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM live_session \
                 WHERE course_id = $course_id \
                 ORDER BY start_at ASC",
            )
            .bind(("course_id", course_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LiveSessionRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_session())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('live_session', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<LiveSession>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM live_session GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM live_session \
                 ORDER BY start_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LiveSessionRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_session())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
