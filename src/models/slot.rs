//! Schedule slot model.
//!
//! A slot is one weekly occurrence of a course taught by one teacher:
//! a weekday plus a half-open time window on that day.

use serde::{Deserialize, Serialize};

use super::{ClockTime, EntityId, TimeWindow, Weekday};

/// A course taught by a teacher on one weekday within `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// Registry-assigned identifier.
    pub id: EntityId,
    pub course_id: EntityId,
    pub teacher_id: EntityId,
    pub day: Weekday,
    /// Start time (inclusive).
    pub start: ClockTime,
    /// End time (exclusive). Always after `start`.
    pub end: ClockTime,
}

impl ScheduleSlot {
    /// Creates a slot. The caller guarantees `start < end`.
    pub fn new(
        id: EntityId,
        course_id: EntityId,
        teacher_id: EntityId,
        day: Weekday,
        window: TimeWindow,
    ) -> Self {
        Self {
            id,
            course_id,
            teacher_id,
            day,
            start: window.start,
            end: window.end,
        }
    }

    /// Time window of this slot.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.window().duration_minutes()
    }

    /// Whether this slot would double-book its teacher together with a
    /// window on `day` for `teacher_id`.
    pub fn conflicts_with(&self, teacher_id: EntityId, day: Weekday, window: &TimeWindow) -> bool {
        self.teacher_id == teacher_id && self.day == day && self.window().overlaps(window)
    }

    /// Canonical weekly ordering key: weekday, then start time, then id.
    #[inline]
    pub fn sort_key(&self) -> (Weekday, ClockTime, EntityId) {
        (self.day, self.start, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(start.parse().unwrap(), end.parse().unwrap())
    }

    #[test]
    fn test_slot_window() {
        let s = ScheduleSlot::new(1, 2, 3, Weekday::Monday, window("08:00", "09:30"));
        assert_eq!(s.duration_minutes(), 90);
        assert_eq!(s.window(), window("08:00", "09:30"));
    }

    #[test]
    fn test_conflicts_with() {
        let s = ScheduleSlot::new(1, 2, 3, Weekday::Monday, window("08:00", "09:00"));

        assert!(s.conflicts_with(3, Weekday::Monday, &window("08:30", "09:30")));
        assert!(!s.conflicts_with(3, Weekday::Monday, &window("09:00", "10:00")));
        assert!(!s.conflicts_with(3, Weekday::Tuesday, &window("08:30", "09:30")));
        assert!(!s.conflicts_with(4, Weekday::Monday, &window("08:30", "09:30")));
    }

    #[test]
    fn test_sort_key_orders_by_day_then_start() {
        let wed = ScheduleSlot::new(1, 1, 1, Weekday::Wednesday, window("10:00", "11:00"));
        let mon = ScheduleSlot::new(2, 1, 1, Weekday::Monday, window("08:00", "09:00"));
        assert!(mon.sort_key() < wed.sort_key());
    }
}
