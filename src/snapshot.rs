//! Full-registry snapshot as plain records.
//!
//! This is the exchange format between the registry and its persistence
//! layer. Ids are integers, slot days are canonical weekday names and
//! times are `HH:MM` strings, so a snapshot read back from disk has to be
//! checked with [`validate_snapshot`](crate::validation::validate_snapshot)
//! before it can become a registry.

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;
use crate::models::{parse_weekly_window, Course, EntityId, ScheduleSlot, Student, Teacher};

/// Every entity of a registry, each collection in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    pub slots: Vec<SlotRecord>,
}

/// A schedule slot with its day and times in text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub id: EntityId,
    pub course_id: EntityId,
    pub teacher_id: EntityId,
    pub day: String,
    pub start: String,
    pub end: String,
}

impl SlotRecord {
    /// Parses the record into a slot.
    ///
    /// Day names go through the same matching as interactive input, so a
    /// hand-edited `"wed"` is accepted and normalized.
    pub fn to_slot(&self) -> Result<ScheduleSlot, InvalidInput> {
        let (day, window) = parse_weekly_window(&self.day, &self.start, &self.end)?;
        Ok(ScheduleSlot::new(
            self.id,
            self.course_id,
            self.teacher_id,
            day,
            window,
        ))
    }
}

impl From<&ScheduleSlot> for SlotRecord {
    fn from(slot: &ScheduleSlot) -> Self {
        Self {
            id: slot.id,
            course_id: slot.course_id,
            teacher_id: slot.teacher_id,
            day: slot.day.name().to_string(),
            start: slot.start.to_string(),
            end: slot.end.to_string(),
        }
    }
}

impl Snapshot {
    /// Total number of records.
    pub fn len(&self) -> usize {
        self.students.len() + self.teachers.len() + self.courses.len() + self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
