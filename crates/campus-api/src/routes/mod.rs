//! Route handlers.
//!
//! Every handler that exposes a content pointer asks the access
//! evaluator first; the decision-to-status mapping lives in
//! [`crate::error`]. The handlers themselves never re-derive access
//! from roles.

pub mod admin;
pub mod assignments;
pub mod auth;
pub mod chat;
pub mod courses;
pub mod enrollments;
pub mod lectures;
pub mod live;

use campus_core::access;
use campus_core::models::actor::{Actor, Role};
use campus_core::models::course::Course;
use campus_core::repository::Pagination;
use serde::Deserialize;

use crate::error::ApiError;

/// Guard for course mutations (edit, publish, delete, add content):
/// the owning instructor or an admin. Courses the actor cannot even
/// list read as not found rather than forbidden.
pub(crate) fn require_manage(actor: &Actor, course: &Course) -> Result<(), ApiError> {
    if !access::course_visible(actor, course) {
        return Err(ApiError::NotFound);
    }
    match actor {
        Actor::User {
            role: Role::Admin, ..
        } => Ok(()),
        Actor::User {
            id,
            role: Role::Instructor,
        } if *id == course.instructor_id => Ok(()),
        _ => Err(ApiError::Forbidden("Instructor access required".into())),
    }
}

pub(crate) fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin access required".into()))
    }
}

/// Offset/limit query parameters with the repository defaults.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct PageParams {
    offset: Option<u64>,
    limit: Option<u64>,
}

impl PageParams {
    pub(crate) fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            offset: self.offset.unwrap_or(defaults.offset),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}
