//! Live session domain model.
//!
//! The meeting URL is provisioned by an external calendar/meeting
//! integration and stored here as an opaque content pointer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub meet_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLiveSession {
    pub course_id: Uuid,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub meet_url: String,
}
