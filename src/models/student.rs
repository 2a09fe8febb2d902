//! Student model.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// A student, optionally enrolled in one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Registry-assigned identifier.
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    /// Course the student is enrolled in. At most one at a time.
    pub course_id: Option<EntityId>,
}

impl Student {
    /// Creates a student with no course. Names are trimmed.
    pub fn new(id: EntityId, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            course_id: None,
        }
    }

    /// Sets the enrolled course.
    #[cfg(test)]
    pub(crate) fn with_course(mut self, course_id: EntityId) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the student is enrolled in the given course.
    #[inline]
    pub fn is_enrolled_in(&self, course_id: EntityId) -> bool {
        self.course_id == Some(course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_trims_names() {
        let s = Student::new(1, "  Ana ", "\tGarcía\n");
        assert_eq!(s.first_name, "Ana");
        assert_eq!(s.last_name, "García");
        assert_eq!(s.full_name(), "Ana García");
        assert_eq!(s.course_id, None);
    }

    #[test]
    fn test_student_enrollment() {
        let s = Student::new(1, "Ana", "García").with_course(3);
        assert!(s.is_enrolled_in(3));
        assert!(!s.is_enrolled_in(4));
    }
}
