//! The school registry.
//!
//! Owns every student, teacher, course and schedule slot, hands out ids
//! and enforces the one scheduling invariant: for any teacher and weekday,
//! that teacher's slots are pairwise non-overlapping.
//!
//! # Atomicity
//! Each operation validates all referenced ids and inputs before touching
//! state. A failed call leaves the registry exactly as it was, including
//! the id counters.
//!
//! # Ids
//! Each entity kind has its own counter starting at 1. Ids are never
//! reused. After [`Registry::restore`] the counters resume at
//! `max(id) + 1` so ids stay unique across save and load.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{EntityKind, InvalidInput, RegistryError, RegistryResult};
use crate::models::{
    parse_weekly_window, ClockTime, Course, EntityId, ScheduleSlot, Student, Teacher, TimeWindow,
    Weekday,
};
use crate::snapshot::{SlotRecord, Snapshot};
use crate::validation::{validate_snapshot, ValidationError, ValidationResult};

/// Monotonic id generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IdCounter {
    next: EntityId,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdCounter {
    /// Counter that continues after the largest existing id.
    ///
    /// Restored ids are at most [`MAX_ENTITY_ID`], so `id + 1` cannot wrap.
    fn resume_after(max: Option<EntityId>) -> Self {
        Self {
            next: max.map_or(1, |id| id + 1),
        }
    }

    fn peek(&self) -> EntityId {
        self.next
    }

    fn advance(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Inserts a freshly allocated entity and returns it.
///
/// Counters never hand out an id twice, so the slot is always vacant.
fn store<T>(map: &mut BTreeMap<EntityId, T>, id: EntityId, value: T) -> &T {
    let previous = map.insert(id, value);
    debug_assert!(previous.is_none(), "id {id} allocated twice");
    &map[&id]
}

/// In-memory school registry.
///
/// Collections are keyed by id in a `BTreeMap`, so every listing comes
/// out in creation order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    students: BTreeMap<EntityId, Student>,
    teachers: BTreeMap<EntityId, Teacher>,
    courses: BTreeMap<EntityId, Course>,
    slots: BTreeMap<EntityId, ScheduleSlot>,
    next_student: IdCounter,
    next_teacher: IdCounter,
    next_course: IdCounter,
    next_slot: IdCounter,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Creation ----

    /// Registers a student with no course. Names are trimmed.
    pub fn create_student(&mut self, first_name: &str, last_name: &str) -> &Student {
        let id = self.next_student.advance();
        let student = Student::new(id, first_name, last_name);
        debug!(id, name = %student.full_name(), "student created");
        store(&mut self.students, id, student)
    }

    /// Registers a teacher. Names are trimmed.
    pub fn create_teacher(&mut self, first_name: &str, last_name: &str) -> &Teacher {
        let id = self.next_teacher.advance();
        let teacher = Teacher::new(id, first_name, last_name);
        debug!(id, name = %teacher.full_name(), "teacher created");
        store(&mut self.teachers, id, teacher)
    }

    /// Registers a course with no teachers. The name is trimmed.
    pub fn create_course(&mut self, name: &str) -> &Course {
        let id = self.next_course.advance();
        let course = Course::new(id, name);
        debug!(id, name = %course.name, "course created");
        store(&mut self.courses, id, course)
    }

    // ---- Assignment ----

    /// Enrolls a student in a course, replacing any previous enrollment.
    pub fn enroll_student(
        &mut self,
        student_id: EntityId,
        course_id: EntityId,
    ) -> RegistryResult<()> {
        self.require_course(course_id)?;
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or(RegistryError::not_found(EntityKind::Student, student_id))?;

        if let Some(previous) = student.course_id.replace(course_id) {
            if previous != course_id {
                debug!(student_id, from = previous, to = course_id, "student moved");
            }
        } else {
            debug!(student_id, course_id, "student enrolled");
        }
        Ok(())
    }

    /// Assigns a teacher to a course. Assigning twice is a no-op.
    pub fn assign_teacher_to_course(
        &mut self,
        teacher_id: EntityId,
        course_id: EntityId,
    ) -> RegistryResult<()> {
        self.require_teacher(teacher_id)?;
        let course = self
            .courses
            .get_mut(&course_id)
            .ok_or(RegistryError::not_found(EntityKind::Course, course_id))?;

        if course.add_teacher(teacher_id) {
            debug!(teacher_id, course_id, "teacher assigned");
        }
        Ok(())
    }

    /// Schedules a weekly slot from raw user input.
    ///
    /// `day` is a weekday name or an abbreviation of at least three letters,
    /// `start` and `end` are `HH:MM` (24h). See [`Registry::create_slot_at`]
    /// for the scheduling rules.
    ///
    /// # Errors
    /// - `NotFound` if the course or teacher does not exist (course checked first)
    /// - `InvalidInput` for an unknown day, a malformed time or `start >= end`
    /// - `Conflict` if the teacher already has an overlapping slot that day
    pub fn create_schedule_slot(
        &mut self,
        course_id: EntityId,
        teacher_id: EntityId,
        day: &str,
        start: &str,
        end: &str,
    ) -> RegistryResult<&ScheduleSlot> {
        self.require_course(course_id)?;
        self.require_teacher(teacher_id)?;
        let (day, window) = parse_weekly_window(day, start, end)?;
        self.insert_slot(course_id, teacher_id, day, window)
    }

    /// Schedules a weekly slot from already-parsed values.
    ///
    /// On success the slot is stored and the teacher is assigned to the
    /// course (idempotently). Nothing changes on failure.
    pub fn create_slot_at(
        &mut self,
        course_id: EntityId,
        teacher_id: EntityId,
        day: Weekday,
        start: ClockTime,
        end: ClockTime,
    ) -> RegistryResult<&ScheduleSlot> {
        self.require_course(course_id)?;
        self.require_teacher(teacher_id)?;
        let window = TimeWindow::new(start, end);
        if !window.is_valid() {
            return Err(InvalidInput::EmptyInterval { start, end }.into());
        }
        self.insert_slot(course_id, teacher_id, day, window)
    }

    /// Conflict check followed by the mutation. References and the
    /// window are already validated.
    fn insert_slot(
        &mut self,
        course_id: EntityId,
        teacher_id: EntityId,
        day: Weekday,
        window: TimeWindow,
    ) -> RegistryResult<&ScheduleSlot> {
        if let Some(existing) = self.find_conflict(teacher_id, day, &window) {
            warn!(
                teacher_id,
                %day,
                start = %window.start,
                end = %window.end,
                existing_slot_id = existing.id,
                "slot rejected: teacher double-booked"
            );
            return Err(RegistryError::Conflict {
                teacher_id,
                day,
                existing_slot_id: existing.id,
            });
        }

        // Existence checked by the caller.
        let Some(course) = self.courses.get_mut(&course_id) else {
            return Err(RegistryError::not_found(EntityKind::Course, course_id));
        };
        course.add_teacher(teacher_id);

        let id = self.next_slot.advance();
        debug!(
            id,
            course_id,
            teacher_id,
            %day,
            start = %window.start,
            end = %window.end,
            "slot created"
        );
        let slot = ScheduleSlot::new(id, course_id, teacher_id, day, window);
        Ok(store(&mut self.slots, id, slot))
    }

    /// First existing slot that would double-book the teacher.
    pub fn find_conflict(
        &self,
        teacher_id: EntityId,
        day: Weekday,
        window: &TimeWindow,
    ) -> Option<&ScheduleSlot> {
        self.slots
            .values()
            .find(|slot| slot.conflicts_with(teacher_id, day, window))
    }

    // ---- Queries ----

    /// Students enrolled in a course, in id order.
    ///
    /// An unknown course simply has no students.
    pub fn students_in_course(&self, course_id: EntityId) -> Vec<&Student> {
        self.students
            .values()
            .filter(|s| s.is_enrolled_in(course_id))
            .collect()
    }

    /// A teacher's weekly schedule, ordered by weekday then start time.
    pub fn teacher_schedule(&self, teacher_id: EntityId) -> Vec<&ScheduleSlot> {
        self.sorted_slots(|slot| slot.teacher_id == teacher_id)
    }

    /// A course's weekly schedule, ordered by weekday then start time.
    pub fn course_schedule(&self, course_id: EntityId) -> Vec<&ScheduleSlot> {
        self.sorted_slots(|slot| slot.course_id == course_id)
    }

    fn sorted_slots(&self, filter: impl Fn(&ScheduleSlot) -> bool) -> Vec<&ScheduleSlot> {
        let mut slots: Vec<&ScheduleSlot> = self.slots.values().filter(|s| filter(s)).collect();
        slots.sort_by_key(|s| s.sort_key());
        slots
    }

    // ---- Lookups ----

    pub fn student(&self, id: EntityId) -> Option<&Student> {
        self.students.get(&id)
    }

    pub fn teacher(&self, id: EntityId) -> Option<&Teacher> {
        self.teachers.get(&id)
    }

    pub fn course(&self, id: EntityId) -> Option<&Course> {
        self.courses.get(&id)
    }

    pub fn slot(&self, id: EntityId) -> Option<&ScheduleSlot> {
        self.slots.get(&id)
    }

    /// All students in id order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// All teachers in id order.
    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.values()
    }

    /// All courses in id order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// All slots in id order.
    pub fn slots(&self) -> impl Iterator<Item = &ScheduleSlot> {
        self.slots.values()
    }

    /// Course by id, or `NotFound`.
    pub fn require_course(&self, id: EntityId) -> RegistryResult<&Course> {
        self.courses
            .get(&id)
            .ok_or(RegistryError::not_found(EntityKind::Course, id))
    }

    /// Teacher by id, or `NotFound`.
    pub fn require_teacher(&self, id: EntityId) -> RegistryResult<&Teacher> {
        self.teachers
            .get(&id)
            .ok_or(RegistryError::not_found(EntityKind::Teacher, id))
    }

    /// Whether the registry holds no entities.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
            && self.teachers.is_empty()
            && self.courses.is_empty()
            && self.slots.is_empty()
    }

    /// Id the next slot will receive.
    pub fn next_slot_id(&self) -> EntityId {
        self.next_slot.peek()
    }

    // ---- Snapshot ----

    /// Removes every entity and restarts all id counters at 1.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copies the whole registry into plain records.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            students: self.students.values().cloned().collect(),
            teachers: self.teachers.values().cloned().collect(),
            courses: self.courses.values().cloned().collect(),
            slots: self.slots.values().map(SlotRecord::from).collect(),
        }
    }

    /// Replaces the registry contents with a snapshot.
    ///
    /// The snapshot is validated first; on failure the registry is left
    /// untouched and every problem is returned. On success this is a
    /// reset followed by a bulk insert, with counters resumed after the
    /// largest id of each kind.
    pub fn restore(&mut self, snapshot: &Snapshot) -> ValidationResult {
        validate_snapshot(snapshot)?;

        let slots = snapshot
            .slots
            .iter()
            .map(|record| {
                record
                    .to_slot()
                    .map_err(|reason| vec![ValidationError::invalid_slot(record.id, &reason)])
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.reset();
        self.students = snapshot.students.iter().map(|s| (s.id, s.clone())).collect();
        self.teachers = snapshot.teachers.iter().map(|t| (t.id, t.clone())).collect();
        self.courses = snapshot.courses.iter().map(|c| (c.id, c.clone())).collect();
        self.slots = slots.into_iter().map(|s| (s.id, s)).collect();

        self.next_student = IdCounter::resume_after(self.students.keys().next_back().copied());
        self.next_teacher = IdCounter::resume_after(self.teachers.keys().next_back().copied());
        self.next_course = IdCounter::resume_after(self.courses.keys().next_back().copied());
        self.next_slot = IdCounter::resume_after(self.slots.keys().next_back().copied());

        info!(
            students = self.students.len(),
            teachers = self.teachers.len(),
            courses = self.courses.len(),
            slots = self.slots.len(),
            "registry restored from snapshot"
        );
        Ok(())
    }

    /// Builds a registry from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, Vec<ValidationError>> {
        let mut registry = Self::new();
        registry.restore(snapshot)?;
        Ok(registry)
    }
}
