//! Protected resources — content items whose visibility is derived
//! transitively through their course.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assignment::Assignment;
use crate::models::lecture::Lecture;
use crate::models::live_session::LiveSession;

/// Discriminant for catalog lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResourceKind {
    Lecture,
    Assignment,
    LiveSession,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Lecture => "lecture",
            ResourceKind::Assignment => "assignment",
            ResourceKind::LiveSession => "live_session",
        }
    }
}

/// A content item gated by enrollment. Each variant carries its course
/// id and a content pointer; visibility is never decided per resource,
/// always per course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProtectedResource {
    Lecture(Lecture),
    Assignment(Assignment),
    LiveSession(LiveSession),
}

impl ProtectedResource {
    pub fn id(&self) -> Uuid {
        match self {
            ProtectedResource::Lecture(l) => l.id,
            ProtectedResource::Assignment(a) => a.id,
            ProtectedResource::LiveSession(s) => s.id,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ProtectedResource::Lecture(_) => ResourceKind::Lecture,
            ProtectedResource::Assignment(_) => ResourceKind::Assignment,
            ProtectedResource::LiveSession(_) => ResourceKind::LiveSession,
        }
    }

    pub fn course_id(&self) -> Uuid {
        match self {
            ProtectedResource::Lecture(l) => l.course_id,
            ProtectedResource::Assignment(a) => a.course_id,
            ProtectedResource::LiveSession(s) => s.course_id,
        }
    }

    /// The gated content pointer, if the resource carries one.
    /// Assignments gate their whole body rather than a single URL.
    pub fn content_url(&self) -> Option<&str> {
        match self {
            ProtectedResource::Lecture(l) => l.video_url.as_deref(),
            ProtectedResource::Assignment(_) => None,
            ProtectedResource::LiveSession(s) => Some(&s.meet_url),
        }
    }
}
