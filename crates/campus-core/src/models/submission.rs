//! Assignment submission domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    /// Content pointer to the uploaded file.
    pub file_url: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmission {
    pub assignment_id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub file_url: String,
}
