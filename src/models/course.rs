//! Course model.
//!
//! A course links to its teachers by id. The teacher list behaves as a
//! set: adding a teacher twice is a no-op. Insertion order is kept so
//! listings stay stable across save and load.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// A course with the teachers assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Registry-assigned identifier.
    pub id: EntityId,
    pub name: String,
    /// Assigned teacher ids, no duplicates.
    pub teacher_ids: Vec<EntityId>,
}

impl Course {
    /// Creates a course with no teachers. The name is trimmed.
    pub fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            teacher_ids: Vec::new(),
        }
    }

    /// Adds a teacher.
    #[cfg(test)]
    pub(crate) fn with_teacher(mut self, teacher_id: EntityId) -> Self {
        self.add_teacher(teacher_id);
        self
    }

    /// Adds a teacher if not already assigned.
    ///
    /// Returns `true` if the teacher was newly added.
    pub fn add_teacher(&mut self, teacher_id: EntityId) -> bool {
        if self.has_teacher(teacher_id) {
            return false;
        }
        self.teacher_ids.push(teacher_id);
        true
    }

    /// Whether the teacher is assigned to this course.
    pub fn has_teacher(&self, teacher_id: EntityId) -> bool {
        self.teacher_ids.contains(&teacher_id)
    }
}
