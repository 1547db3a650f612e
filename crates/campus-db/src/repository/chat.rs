//! SurrealDB implementation of [`ChatMessageRepository`].

use campus_core::error::CampusResult;
use campus_core::models::chat::{ChatMessage, CreateChatMessage};
use campus_core::repository::{ChatMessageRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ChatMessageRow {
    course_id: String,
    sender_id: String,
    content: String,
    sent_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ChatMessageRowWithId {
    record_id: String,
    course_id: String,
    sender_id: String,
    content: String,
    sent_at: DateTime<Utc>,
}

impl ChatMessageRow {
    fn into_message(self, id: Uuid) -> Result<ChatMessage, DbError> {
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        let sender_id = Uuid::parse_str(&self.sender_id)
            .map_err(|e| DbError::Decode(format!("invalid sender UUID: {e}")))?;
        Ok(ChatMessage {
            id,
            course_id,
            sender_id,
            content: self.content,
            sent_at: self.sent_at,
        })
    }
}

impl ChatMessageRowWithId {
    fn try_into_message(self) -> Result<ChatMessage, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let course_id = Uuid::parse_str(&self.course_id)
            .map_err(|e| DbError::Decode(format!("invalid course UUID: {e}")))?;
        let sender_id = Uuid::parse_str(&self.sender_id)
            .map_err(|e| DbError::Decode(format!("invalid sender UUID: {e}")))?;
        Ok(ChatMessage {
            id,
            course_id,
            sender_id,
            content: self.content,
            sent_at: self.sent_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the ChatMessage repository.
#[derive(Clone)]
pub struct SurrealChatMessageRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealChatMessageRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ChatMessageRepository for SurrealChatMessageRepository<C> {
    async fn create(&self, input: CreateChatMessage) -> CampusResult<ChatMessage> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('chat_message', $id) SET \
                 course_id = $course_id, sender_id = $sender_id, \
                 content = $content",
            )
            .bind(("id", id_str.clone()))
            .bind(("course_id", input.course_id.to_string()))
            .bind(("sender_id", input.sender_id.to_string()))
            .bind(("content", input.content))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::on_create("chat_message", e))?;

        let rows: Vec<ChatMessageRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "chat_message".into(),
            id: id_str,
        })?;

        Ok(row.into_message(id)?)
    }

    async fn list_by_course(&self, course_id: Uuid) -> CampusResult<Vec<ChatMessage>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM chat_message \
                 WHERE course_id = $course_id \
                 ORDER BY sent_at ASC",
            )
            .bind(("course_id", course_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ChatMessageRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_message())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('chat_message', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<ChatMessage>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM chat_message GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM chat_message \
                 ORDER BY sent_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ChatMessageRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_message())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
