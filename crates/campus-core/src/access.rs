//! Access evaluation — the single authority on who may see gated
//! course content.
//!
//! Every consumer (HTTP route, UI gate) asks the same question through
//! the same function instead of re-branching on roles at each call
//! site. The decision itself is the pure, total [`evaluate`] function;
//! [`AccessEvaluator`] is the thin async shell that resolves the course
//! and enrollment state and delegates to it.

use uuid::Uuid;

use crate::error::{CampusError, CampusResult};
use crate::models::actor::{Actor, Role};
use crate::models::course::Course;
use crate::models::resource::{ProtectedResource, ResourceKind};
use crate::repository::{EnrollmentRepository, ResourceCatalog};

/// Outcome of an access check. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// The actor must enroll (or authenticate and enroll) first.
    NotEnrolled,
    /// The course exists but is a draft. Consumers must respond exactly
    /// as they do for [`Decision::NotFound`]; the standard evaluation
    /// path already collapses drafts to `NotFound` so outsiders cannot
    /// probe for their existence.
    CourseUnpublished,
    NotFound,
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Whether the actor bypasses enrollment and publish gating: admins
/// always, instructors only for their own course.
fn bypasses_gating(actor: &Actor, course: &Course) -> bool {
    match actor {
        Actor::User {
            role: Role::Admin, ..
        } => true,
        Actor::User {
            id,
            role: Role::Instructor,
        } => *id == course.instructor_id,
        _ => false,
    }
}

/// Decide access to content gated by `course`.
///
/// Pure and deterministic: same inputs always yield the same decision.
/// `course` is `None` when the lookup found nothing; `enrolled` is the
/// enrollment index's answer for (actor, course) and is ignored on
/// every path that does not depend on it.
///
/// Precedence, first match wins:
/// 1. no course → `NotFound`
/// 2. admin or owning instructor → `Allow`
/// 3. unpublished → `NotFound` (drafts indistinguishable from
///    nonexistent courses to outsiders)
/// 4. enrolled → `Allow`, otherwise `NotEnrolled` (guests and foreign
///    instructors hold no enrollments, so they land here too)
pub fn evaluate(actor: &Actor, course: Option<&Course>, enrolled: bool) -> Decision {
    let Some(course) = course else {
        return Decision::NotFound;
    };
    if bypasses_gating(actor, course) {
        return Decision::Allow;
    }
    if !course.published {
        return Decision::NotFound;
    }
    if enrolled {
        Decision::Allow
    } else {
        Decision::NotEnrolled
    }
}

/// Whether course *metadata* (title, description, lecture titles) is
/// listable by the actor. Listing visibility is independent of content
/// gating: an unenrolled student may browse a published course but not
/// its content pointers.
pub fn course_visible(actor: &Actor, course: &Course) -> bool {
    course.published || bypasses_gating(actor, course)
}

/// Async evaluation service over the catalog and enrollment index.
///
/// Generic over the repository traits so the core stays free of any
/// database dependency. Read-only: evaluation never writes, and is
/// safe under arbitrary request concurrency.
pub struct AccessEvaluator<C: ResourceCatalog, E: EnrollmentRepository> {
    catalog: C,
    enrollments: E,
}

impl<C: ResourceCatalog, E: EnrollmentRepository> AccessEvaluator<C, E> {
    pub fn new(catalog: C, enrollments: E) -> Self {
        Self {
            catalog,
            enrollments,
        }
    }

    /// Decide access to an already-fetched resource.
    pub async fn can_access(
        &self,
        actor: &Actor,
        resource: &ProtectedResource,
    ) -> CampusResult<Decision> {
        let course = match self.catalog.course_of(resource).await {
            Ok(course) => Some(course),
            Err(CampusError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        self.decide(actor, course).await
    }

    /// Decide access to a resource by id. A missing resource is
    /// `NotFound`, identical to a missing course.
    pub async fn can_access_id(
        &self,
        actor: &Actor,
        kind: ResourceKind,
        id: Uuid,
    ) -> CampusResult<Decision> {
        let resource = match self.catalog.resource_by_id(kind, id).await {
            Ok(resource) => resource,
            Err(CampusError::NotFound { .. }) => return Ok(Decision::NotFound),
            Err(e) => return Err(e),
        };
        self.can_access(actor, &resource).await
    }

    /// Decide access to a course's gated content as a whole (chat,
    /// assignment listings) without naming a single resource.
    pub async fn can_access_course(
        &self,
        actor: &Actor,
        course_id: Uuid,
    ) -> CampusResult<Decision> {
        let course = match self.catalog.course_by_id(course_id).await {
            Ok(course) => Some(course),
            Err(CampusError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        self.decide(actor, course).await
    }

    async fn decide(&self, actor: &Actor, course: Option<Course>) -> CampusResult<Decision> {
        // Consult the index only on the path whose outcome depends on
        // it; `evaluate` ignores the flag everywhere else.
        let enrolled = match (&course, actor) {
            (Some(c), Actor::User { id, .. })
                if c.published && !bypasses_gating(actor, c) =>
            {
                self.enrollments.is_enrolled(*id, c.id).await?
            }
            _ => false,
        };
        Ok(evaluate(actor, course.as_ref(), enrolled))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn course(instructor_id: Uuid, published: bool) -> Course {
        Course {
            id: Uuid::new_v4(),
            instructor_id,
            title: "Systems Programming".into(),
            description: "".into(),
            tags: vec![],
            published,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn missing_course_is_not_found_for_everyone() {
        let admin = Actor::user(Uuid::new_v4(), Role::Admin);
        assert_eq!(evaluate(&Actor::Guest, None, false), Decision::NotFound);
        assert_eq!(evaluate(&admin, None, false), Decision::NotFound);
        // The enrollment flag cannot rescue a missing course.
        assert_eq!(evaluate(&Actor::Guest, None, true), Decision::NotFound);
    }

    #[test]
    fn admin_bypasses_everything() {
        let admin = Actor::user(Uuid::new_v4(), Role::Admin);
        let draft = course(Uuid::new_v4(), false);
        let live = course(Uuid::new_v4(), true);
        assert_eq!(evaluate(&admin, Some(&draft), false), Decision::Allow);
        assert_eq!(evaluate(&admin, Some(&live), false), Decision::Allow);
    }

    #[test]
    fn owning_instructor_bypasses_regardless_of_enrollment() {
        let instructor_id = Uuid::new_v4();
        let owner = Actor::user(instructor_id, Role::Instructor);
        let draft = course(instructor_id, false);
        let live = course(instructor_id, true);
        assert_eq!(evaluate(&owner, Some(&draft), false), Decision::Allow);
        assert_eq!(evaluate(&owner, Some(&live), false), Decision::Allow);
    }

    #[test]
    fn foreign_instructor_gets_no_bypass() {
        let foreign = Actor::user(Uuid::new_v4(), Role::Instructor);
        let draft = course(Uuid::new_v4(), false);
        let live = course(Uuid::new_v4(), true);
        // Draft reads as nonexistent, published content is gated.
        assert_eq!(evaluate(&foreign, Some(&draft), false), Decision::NotFound);
        assert_eq!(
            evaluate(&foreign, Some(&live), false),
            Decision::NotEnrolled
        );
    }

    #[test]
    fn unpublished_opacity() {
        // An outsider cannot distinguish a draft course from a
        // nonexistent one: same decision value.
        let student = Actor::user(Uuid::new_v4(), Role::Student);
        let draft = course(Uuid::new_v4(), false);
        assert_eq!(
            evaluate(&student, Some(&draft), false),
            evaluate(&student, None, false),
        );
    }

    #[test]
    fn student_access_follows_enrollment() {
        let student = Actor::user(Uuid::new_v4(), Role::Student);
        let live = course(Uuid::new_v4(), true);
        assert_eq!(
            evaluate(&student, Some(&live), false),
            Decision::NotEnrolled
        );
        assert_eq!(evaluate(&student, Some(&live), true), Decision::Allow);
    }

    #[test]
    fn guest_must_authenticate_and_enroll() {
        let live = course(Uuid::new_v4(), true);
        assert_eq!(
            evaluate(&Actor::Guest, Some(&live), false),
            Decision::NotEnrolled
        );
    }

    #[test]
    fn evaluate_is_deterministic() {
        let student = Actor::user(Uuid::new_v4(), Role::Student);
        let live = course(Uuid::new_v4(), true);
        let first = evaluate(&student, Some(&live), true);
        for _ in 0..100 {
            assert_eq!(evaluate(&student, Some(&live), true), first);
        }
    }

    #[test]
    fn listing_visibility_is_independent_of_gating() {
        let student = Actor::user(Uuid::new_v4(), Role::Student);
        let live = course(Uuid::new_v4(), true);
        // Metadata is browsable even though content is denied.
        assert!(course_visible(&student, &live));
        assert!(course_visible(&Actor::Guest, &live));
        assert_eq!(
            evaluate(&student, Some(&live), false),
            Decision::NotEnrolled
        );

        let draft = course(Uuid::new_v4(), false);
        assert!(!course_visible(&student, &draft));
        assert!(!course_visible(&Actor::Guest, &draft));
        assert!(course_visible(
            &Actor::user(draft.instructor_id, Role::Instructor),
            &draft
        ));
        assert!(course_visible(
            &Actor::user(Uuid::new_v4(), Role::Admin),
            &draft
        ));
    }
}
