//! SurrealDB implementation of [`CourseRepository`].

use campus_core::error::CampusResult;
use campus_core::models::course::{Course, CreateCourse, UpdateCourse};
use campus_core::repository::{CourseRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CourseRow {
    instructor_id: String,
    title: String,
    description: String,
    tags: Vec<String>,
    published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CourseRowWithId {
    record_id: String,
    instructor_id: String,
    title: String,
    description: String,
    tags: Vec<String>,
    published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self, id: Uuid) -> Result<Course, DbError> {
        let instructor_id = Uuid::parse_str(&self.instructor_id)
            .map_err(|e| DbError::Decode(format!("invalid instructor UUID: {e}")))?;
        Ok(Course {
            id,
            instructor_id,
            title: self.title,
            description: self.description,
            tags: self.tags,
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl CourseRowWithId {
    fn try_into_course(self) -> Result<Course, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let instructor_id = Uuid::parse_str(&self.instructor_id)
            .map_err(|e| DbError::Decode(format!("invalid instructor UUID: {e}")))?;
        Ok(Course {
            id,
            instructor_id,
            title: self.title,
            description: self.description,
            tags: self.tags,
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Course repository.
#[derive(Clone)]
pub struct SurrealCourseRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCourseRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        condition: &str,
        bind: Option<(&'static str, String)>,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Course>> {
        let count_query = format!("SELECT count() AS total FROM course {condition} GROUP ALL");
        let mut count_builder = self.db.query(&count_query);
        if let Some((key, value)) = &bind {
            count_builder = count_builder.bind((*key, value.clone()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM course {condition} \
             ORDER BY created_at ASC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(&query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some((key, value)) = bind {
            builder = builder.bind((key, value));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<CourseRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_course())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

impl<C: Connection> CourseRepository for SurrealCourseRepository<C> {
    async fn create(&self, input: CreateCourse) -> CampusResult<Course> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('course', $id) SET \
                 instructor_id = $instructor_id, \
                 title = $title, description = $description, \
                 tags = $tags, published = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("instructor_id", input.instructor_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("tags", input.tags))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::on_create("course", e))?;

        let rows: Vec<CourseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "course".into(),
            id: id_str,
        })?;

        Ok(row.into_course(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Course> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('course', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CourseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "course".into(),
            id: id_str,
        })?;

        Ok(row.into_course(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateCourse) -> CampusResult<Course> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.tags.is_some() {
            sets.push("tags = $tags");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('course', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(tags) = input.tags {
            builder = builder.bind(("tags", tags));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CourseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "course".into(),
            id: id_str,
        })?;

        Ok(row.into_course(id)?)
    }

    async fn publish(&self, id: Uuid) -> CampusResult<Course> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('course', $id) SET \
                 published = true, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CourseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "course".into(),
            id: id_str,
        })?;

        Ok(row.into_course(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('course', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_published(&self, pagination: Pagination) -> CampusResult<PaginatedResult<Course>> {
        self.list_where("WHERE published = true", None, pagination)
            .await
    }

    async fn list_by_instructor(
        &self,
        instructor_id: Uuid,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Course>> {
        self.list_where(
            "WHERE instructor_id = $instructor_id",
            Some(("instructor_id", instructor_id.to_string())),
            pagination,
        )
        .await
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<Course>> {
        self.list_where("", None, pagination).await
    }
}
