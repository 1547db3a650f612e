//! The authenticated (or anonymous) requester.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an authenticated user. Closed set — access decisions dispatch
/// on this exactly once, inside the evaluator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Instructor => "Instructor",
            Role::Admin => "Admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "Student" => Some(Role::Student),
            "Instructor" => Some(Role::Instructor),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The requester an access decision is made for. Immutable per request.
///
/// `Guest` is an unauthenticated visitor: they can browse published course
/// metadata but hold no enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Guest,
    User { id: Uuid, role: Role },
}

impl Actor {
    pub fn user(id: Uuid, role: Role) -> Self {
        Actor::User { id, role }
    }

    /// The user id, if authenticated.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Actor::Guest => None,
            Actor::User { id, .. } => Some(*id),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Actor::Guest => None,
            Actor::User { role, .. } => Some(*role),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::User { role: Role::Admin, .. })
    }
}
