//! Enrollment record domain model.
//!
//! At most one record exists per (student, course) — enforced by a
//! unique index at the storage layer, not by application code. Records
//! are never mutated after creation; only admin moderation deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnrollment {
    pub student_id: Uuid,
    pub course_id: Uuid,
}
