//! CSV export of registry queries.
//!
//! Renders the results of [`Registry::students_in_course`],
//! [`Registry::teacher_schedule`] and [`Registry::course_schedule`] as CSV
//! text: one header row, `\n` line endings, and fields quoted only when
//! they contain a comma, a double quote or a line break.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::models::{Course, ScheduleSlot, Student, Teacher};
use crate::registry::Registry;

/// Header of [`students_csv`].
pub const STUDENT_HEADER: [&str; 5] = [
    "course_id",
    "course",
    "student_id",
    "first_name",
    "last_name",
];

/// Header of [`teacher_schedule_csv`].
pub const TEACHER_SCHEDULE_HEADER: [&str; 8] = [
    "teacher_id",
    "teacher",
    "slot_id",
    "course_id",
    "course",
    "day",
    "start",
    "end",
];

/// Header of [`course_schedule_csv`].
pub const COURSE_SCHEDULE_HEADER: [&str; 8] = [
    "course_id",
    "course",
    "slot_id",
    "teacher_id",
    "teacher",
    "day",
    "start",
    "end",
];

/// Row-by-row CSV text builder.
#[derive(Debug, Default)]
struct CsvText {
    out: String,
}

impl CsvText {
    fn with_header(header: &[&str]) -> Self {
        let mut text = Self::default();
        text.row(header.iter().copied());
        text
    }

    fn row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            push_field(&mut self.out, field.as_ref());
        }
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Students of a course, one row per student.
pub fn students_csv(course: &Course, students: &[&Student]) -> String {
    let mut csv = CsvText::with_header(&STUDENT_HEADER);
    for student in students {
        csv.row([
            course.id.to_string(),
            course.name.clone(),
            student.id.to_string(),
            student.first_name.clone(),
            student.last_name.clone(),
        ]);
    }
    csv.finish()
}

/// A teacher's weekly schedule. Course names are looked up in `registry`;
/// an unknown course renders as an empty name.
pub fn teacher_schedule_csv(
    registry: &Registry,
    teacher: &Teacher,
    slots: &[&ScheduleSlot],
) -> String {
    let mut csv = CsvText::with_header(&TEACHER_SCHEDULE_HEADER);
    let teacher_name = teacher.full_name();
    for slot in slots {
        let course_name = registry
            .course(slot.course_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        csv.row([
            teacher.id.to_string(),
            teacher_name.clone(),
            slot.id.to_string(),
            slot.course_id.to_string(),
            course_name,
            slot.day.to_string(),
            slot.start.to_string(),
            slot.end.to_string(),
        ]);
    }
    csv.finish()
}

/// A course's weekly schedule. Teacher names are looked up in `registry`.
pub fn course_schedule_csv(
    registry: &Registry,
    course: &Course,
    slots: &[&ScheduleSlot],
) -> String {
    let mut csv = CsvText::with_header(&COURSE_SCHEDULE_HEADER);
    for slot in slots {
        let teacher_name = registry
            .teacher(slot.teacher_id)
            .map(Teacher::full_name)
            .unwrap_or_default();
        csv.row([
            course.id.to_string(),
            course.name.clone(),
            slot.id.to_string(),
            slot.teacher_id.to_string(),
            teacher_name,
            slot.day.to_string(),
            slot.start.to_string(),
            slot.end.to_string(),
        ]);
    }
    csv.finish()
}

/// Writes CSV text to `path`, replacing any existing file.
pub fn write_csv(path: impl AsRef<Path>, text: &str) -> io::Result<()> {
    let path = path.as_ref();
    fs::write(path, text)?;
    let rows = text.lines().count().saturating_sub(1);
    info!(path = %path.display(), rows, "csv written");
    Ok(())
}
