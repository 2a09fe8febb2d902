//! Snapshot validation.
//!
//! Checks structural integrity of a [`Snapshot`] before it replaces the
//! contents of a registry. Detects:
//! - Duplicate IDs
//! - Dangling references (student → course, course → teacher,
//!   slot → course/teacher)
//! - Unknown weekday names and malformed or empty time intervals
//! - Teachers booked into overlapping slots on the same day
//!
//! All problems are collected; validation does not stop at the first one.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::error::InvalidInput;
use crate::models::{ClockTime, EntityId, ScheduleSlot, Weekday, MAX_ENTITY_ID};
use crate::snapshot::Snapshot;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID, or a course lists the
    /// same teacher twice.
    DuplicateId,
    /// An ID is zero or above [`MAX_ENTITY_ID`].
    IdOutOfRange,
    /// A record references an entity that doesn't exist.
    InvalidReference,
    /// A slot day is not a recognizable weekday.
    InvalidDay,
    /// A slot time is malformed or its interval is empty.
    InvalidTime,
    /// Two slots of the same teacher overlap on the same day.
    Overlap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A slot record whose day or times could not be parsed.
    pub(crate) fn invalid_slot(slot_id: EntityId, reason: &InvalidInput) -> Self {
        let kind = match reason {
            InvalidInput::UnknownDay(_) => ValidationErrorKind::InvalidDay,
            InvalidInput::MalformedTime(_) | InvalidInput::EmptyInterval { .. } => {
                ValidationErrorKind::InvalidTime
            }
        };
        Self::new(kind, format!("Slot {slot_id}: {reason}"))
    }
}

/// Validates a snapshot.
///
/// Checks:
/// 1. No duplicate student, teacher, course or slot IDs, all within
///    `1..=MAX_ENTITY_ID`
/// 2. Every enrolled student points to an existing course
/// 3. Every course teacher points to an existing teacher, at most once
/// 4. Every slot points to an existing course and teacher
/// 5. Every slot has a valid day and a non-empty `HH:MM` interval
/// 6. No teacher has overlapping slots on the same day
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(snapshot: &Snapshot) -> ValidationResult {
    let mut errors = Vec::new();

    let course_ids = collect_ids(snapshot.courses.iter().map(|c| c.id), "course", &mut errors);
    let teacher_ids = collect_ids(snapshot.teachers.iter().map(|t| t.id), "teacher", &mut errors);
    collect_ids(snapshot.students.iter().map(|s| s.id), "student", &mut errors);
    collect_ids(snapshot.slots.iter().map(|s| s.id), "slot", &mut errors);

    for student in &snapshot.students {
        if let Some(course_id) = student.course_id {
            if !course_ids.contains(&course_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!(
                        "Student {} references unknown course {}",
                        student.id, course_id
                    ),
                ));
            }
        }
    }

    for course in &snapshot.courses {
        let mut listed = HashSet::new();
        for teacher_id in &course.teacher_ids {
            if !listed.insert(*teacher_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!(
                        "Course {} lists teacher {} more than once",
                        course.id, teacher_id
                    ),
                ));
            } else if !teacher_ids.contains(teacher_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!(
                        "Course {} references unknown teacher {}",
                        course.id, teacher_id
                    ),
                ));
            }
        }
    }

    let mut parsed = Vec::with_capacity(snapshot.slots.len());
    for record in &snapshot.slots {
        if !course_ids.contains(&record.course_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!(
                    "Slot {} references unknown course {}",
                    record.id, record.course_id
                ),
            ));
        }
        if !teacher_ids.contains(&record.teacher_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!(
                    "Slot {} references unknown teacher {}",
                    record.id, record.teacher_id
                ),
            ));
        }
        match record.to_slot() {
            Ok(slot) => parsed.push(slot),
            Err(reason) => errors.push(ValidationError::invalid_slot(record.id, &reason)),
        }
    }

    errors.extend(detect_overlaps(&parsed));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_ids(
    ids: impl Iterator<Item = EntityId>,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> HashSet<EntityId> {
    let mut seen = HashSet::new();
    for id in ids {
        if id == 0 || id > MAX_ENTITY_ID {
            errors.push(ValidationError::new(
                ValidationErrorKind::IdOutOfRange,
                format!("{label} ID {id} is out of range"),
            ));
        }
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
    seen
}

/// Finds double-booked teachers.
///
/// # Algorithm
/// Groups slots by (teacher, day) and sweeps each group in start order,
/// tracking the slot with the latest end so far. A slot starting before
/// that end overlaps it (half-open intervals, so touching is fine).
fn detect_overlaps(slots: &[ScheduleSlot]) -> Vec<ValidationError> {
    let mut groups: BTreeMap<(EntityId, Weekday), Vec<&ScheduleSlot>> = BTreeMap::new();
    for slot in slots {
        groups
            .entry((slot.teacher_id, slot.day))
            .or_default()
            .push(slot);
    }

    let mut errors = Vec::new();
    for ((teacher_id, day), mut group) in groups {
        group.sort_by_key(|s| s.sort_key());

        let mut latest: Option<(ClockTime, EntityId)> = None;
        for slot in group {
            if let Some((end, id)) = latest {
                if slot.start < end {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::Overlap,
                        format!(
                            "Teacher {teacher_id} is double-booked on {day}: slots {id} and {}",
                            slot.id
                        ),
                    ));
                }
            }
            if latest.map_or(true, |(end, _)| slot.end > end) {
                latest = Some((slot.end, slot.id));
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Student, Teacher};
    use crate::snapshot::SlotRecord;

    fn slot(id: EntityId, teacher_id: EntityId, day: &str, start: &str, end: &str) -> SlotRecord {
        SlotRecord {
            id,
            course_id: 1,
            teacher_id,
            day: day.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            students: vec![
                Student::new(1, "Ana", "Gil").with_course(1),
                Student::new(2, "Leo", "Sanz"),
            ],
            teachers: vec![Teacher::new(1, "Luis", "Paz"), Teacher::new(2, "Eva", "Roca")],
            courses: vec![Course::new(1, "Math").with_teacher(1).with_teacher(2)],
            slots: vec![
                slot(1, 1, "Monday", "08:00", "09:00"),
                slot(2, 1, "Monday", "09:00", "10:00"),
                slot(3, 2, "Monday", "08:00", "09:00"),
            ],
        }
    }

    fn kinds(errors: &[ValidationError]) -> Vec<ValidationErrorKind> {
        errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_snapshot() {
        assert!(validate_snapshot(&sample_snapshot()).is_ok());
        assert!(validate_snapshot(&Snapshot::default()).is_ok());
    }

    #[test]
    fn test_duplicate_student_id() {
        let mut snapshot = sample_snapshot();
        snapshot.students.push(Student::new(1, "Dup", "Licate"));

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("student")));
    }

    #[test]
    fn test_same_id_across_kinds_is_fine() {
        // Each entity kind has its own id sequence.
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.students[0].id, snapshot.courses[0].id);
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_student_unknown_course() {
        let mut snapshot = sample_snapshot();
        snapshot.students[1].course_id = Some(42);

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidReference]);
        assert!(errors[0].message.contains("42"));
    }

    #[test]
    fn test_course_unknown_teacher() {
        let mut snapshot = sample_snapshot();
        snapshot.courses[0].teacher_ids.push(9);

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidReference]);
    }

    #[test]
    fn test_course_duplicate_teacher() {
        let mut snapshot = sample_snapshot();
        snapshot.courses[0].teacher_ids.push(1);

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::DuplicateId]);
        assert!(errors[0].message.contains("teacher 1 more than once"));
    }

    #[test]
    fn test_id_out_of_range() {
        let mut snapshot = sample_snapshot();
        snapshot.students[1].id = EntityId::MAX;
        snapshot.teachers.push(Teacher::new(0, "Zero", "Id"));

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![ValidationErrorKind::IdOutOfRange, ValidationErrorKind::IdOutOfRange]
        );

        snapshot.students[1].id = MAX_ENTITY_ID;
        snapshot.teachers.pop();
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_slot_unknown_references() {
        let mut snapshot = sample_snapshot();
        snapshot.slots.push(SlotRecord {
            course_id: 5,
            ..slot(4, 7, "Tuesday", "08:00", "09:00")
        });

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidReference));
    }

    #[test]
    fn test_invalid_day_and_time() {
        let mut snapshot = sample_snapshot();
        snapshot.slots.push(slot(4, 1, "Someday", "08:00", "09:00"));
        snapshot.slots.push(slot(5, 1, "Friday", "8h", "09:00"));
        snapshot.slots.push(slot(6, 1, "Friday", "12:00", "11:00"));

        let errors = validate_snapshot(&snapshot).unwrap_err();
        let found = kinds(&errors);
        assert!(found.contains(&ValidationErrorKind::InvalidDay));
        assert_eq!(
            found
                .iter()
                .filter(|k| **k == ValidationErrorKind::InvalidTime)
                .count(),
            2
        );
    }

    #[test]
    fn test_overlap_detected() {
        let mut snapshot = sample_snapshot();
        snapshot.slots.push(slot(4, 1, "monday", "08:30", "09:30"));

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::Overlap));
        assert!(errors[0].message.contains("Teacher 1"));
    }

    #[test]
    fn test_overlap_inside_long_slot() {
        // 08:00-12:00 covers 09:00-10:00 and 10:30-11:00
        let mut snapshot = sample_snapshot();
        snapshot.slots = vec![
            slot(1, 1, "Tuesday", "08:00", "12:00"),
            slot(2, 1, "Tuesday", "09:00", "10:00"),
            slot(3, 1, "Tuesday", "10:30", "11:00"),
        ];

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_touching_slots_do_not_overlap() {
        let mut snapshot = sample_snapshot();
        snapshot.slots = vec![
            slot(1, 1, "Wednesday", "10:00", "11:00"),
            slot(2, 1, "Wednesday", "11:00", "12:00"),
            slot(3, 1, "Thursday", "10:30", "11:30"),
        ];
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let snapshot = Snapshot {
            students: vec![Student::new(1, "A", "B").with_course(3)],
            teachers: vec![],
            courses: vec![Course::new(1, "X"), Course::new(1, "Y")],
            slots: vec![],
        };

        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
