//! Lecture domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    /// Content pointer — never serialized to a caller the evaluator
    /// has not allowed.
    pub video_url: Option<String>,
    /// Ordering within the course.
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLecture {
    pub course_id: Uuid,
    pub title: String,
    pub video_url: Option<String>,
    pub position: u32,
}
