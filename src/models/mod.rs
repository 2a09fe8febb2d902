//! School scheduling domain models.
//!
//! Entities reference each other by [`EntityId`], never by owning
//! pointers. The [`Registry`](crate::Registry) collections are the single
//! source of truth for every lookup.
//!
//! | Entity | References |
//! |--------|-----------|
//! | Student | zero or one Course |
//! | Teacher | none |
//! | Course | many Teachers |
//! | ScheduleSlot | one Course, one Teacher |

mod calendar;
mod course;
mod slot;
mod student;
mod teacher;

pub use calendar::{parse_weekly_window, ClockTime, TimeWindow, Weekday};
pub use course::Course;
pub use slot::ScheduleSlot;
pub use student::Student;
pub use teacher::Teacher;

/// Identifier assigned by the registry. Starts at 1, never reused.
pub type EntityId = u64;

/// Largest id accepted from a snapshot.
///
/// Leaves the upper half of the id range to the counters, so resuming
/// after a loaded id can never overflow.
pub const MAX_ENTITY_ID: EntityId = i64::MAX as EntityId;
