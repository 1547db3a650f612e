//! Enrollment orchestration — the only mutation in the access model.

use uuid::Uuid;

use crate::error::{CampusError, CampusResult};
use crate::models::enrollment::{CreateEnrollment, EnrollmentRecord};
use crate::repository::{CourseRepository, EnrollmentRepository};

/// Enrolls students into courses.
///
/// Generic over repository implementations so the orchestration has no
/// dependency on the database crate.
pub struct EnrollmentService<C: CourseRepository, E: EnrollmentRepository> {
    courses: C,
    enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> EnrollmentService<C, E> {
    pub fn new(courses: C, enrollments: E) -> Self {
        Self {
            courses,
            enrollments,
        }
    }

    /// Enroll a student into a published course.
    ///
    /// Duplicate enrolls are idempotent: the unique index rejects the
    /// second insert and the existing record is returned, so a student
    /// double-clicking "Enroll" from two tabs converges on one record
    /// either way. Fails with `NotFound` for a missing course and
    /// `CourseNotPublished` for a draft — callers surface both as the
    /// same generic not-found.
    pub async fn enroll(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> CampusResult<EnrollmentRecord> {
        let course = self.courses.get_by_id(course_id).await?;
        if !course.published {
            return Err(CampusError::CourseNotPublished {
                id: course_id.to_string(),
            });
        }

        match self
            .enrollments
            .insert(CreateEnrollment {
                student_id,
                course_id,
            })
            .await
        {
            Ok(record) => Ok(record),
            // Lost the race (or a retry): someone already created the
            // record. Return it.
            Err(CampusError::AlreadyExists { .. }) => {
                self.enrollments.get_by_pair(student_id, course_id).await
            }
            Err(e) => Err(e),
        }
    }
}
