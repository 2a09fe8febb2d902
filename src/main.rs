use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use school_schedule::export;
use school_schedule::models::{EntityId, ScheduleSlot};
use school_schedule::persistence::{self, PersistenceError};
use school_schedule::{Registry, RegistryError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "school", version, about = "Interactive school scheduling registry")]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Snapshot file, loaded at start if it exists and saved on exit.
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut registry = Registry::new();
    if let Some(path) = cli.data.as_deref().filter(|p| p.exists()) {
        persistence::load_into(&mut registry, path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(registry, stdin.lock(), stdout.lock(), cli.data.clone());
    console.run()?;

    if let Some(path) = &cli.data {
        persistence::save_to_path(console.registry(), path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Why a menu command did not complete.
#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("{0}")]
    Input(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("end of input")]
    Eof,
}

const MENU: &str = "\
--- Menu ---
1) Create student
2) Create teacher
3) Create course
4) Enroll student in course
5) Assign teacher to course
6) Create schedule slot
7) Export course students (CSV)
8) Show teacher schedule
9) Show course schedule
s) Save
0) Exit";

/// Line-oriented menu driver over any input and output.
struct Console<R, W> {
    registry: Registry,
    input: R,
    output: W,
    data: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn new(registry: Registry, input: R, output: W, data: Option<PathBuf>) -> Self {
        Self {
            registry,
            input,
            output,
            data,
        }
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs until `0` or end of input. Command errors are printed and the
    /// loop continues; only output failures end it early.
    fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "School scheduling registry")?;
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let choice = match self.ask("Choose an option") {
                Ok(choice) => choice,
                Err(CommandError::Io(e)) => return Err(e),
                Err(_) => break,
            };
            if choice == "0" {
                writeln!(self.output, "Bye!")?;
                break;
            }

            match self.dispatch(&choice) {
                Ok(()) => {}
                Err(CommandError::Eof) => break,
                Err(CommandError::Io(e)) => return Err(e),
                Err(e) => writeln!(self.output, "error: {e}")?,
            }
        }
        self.output.flush()
    }

    fn dispatch(&mut self, choice: &str) -> Result<(), CommandError> {
        match choice {
            "1" => {
                let first = self.ask("First name")?;
                let last = self.ask("Last name")?;
                let student = self.registry.create_student(&first, &last);
                let line = format!("Student created: {} {}", student.id, student.full_name());
                self.say(&line)
            }
            "2" => {
                let first = self.ask("First name")?;
                let last = self.ask("Last name")?;
                let teacher = self.registry.create_teacher(&first, &last);
                let line = format!("Teacher created: {} {}", teacher.id, teacher.full_name());
                self.say(&line)
            }
            "3" => {
                let name = self.ask("Course name")?;
                let course = self.registry.create_course(&name);
                let line = format!("Course created: {} {}", course.id, course.name);
                self.say(&line)
            }
            "4" => {
                let student_id = self.ask_id("Student id")?;
                let course_id = self.ask_id("Course id")?;
                self.registry.enroll_student(student_id, course_id)?;
                self.say("Student enrolled in course")
            }
            "5" => {
                let teacher_id = self.ask_id("Teacher id")?;
                let course_id = self.ask_id("Course id")?;
                self.registry.assign_teacher_to_course(teacher_id, course_id)?;
                self.say("Teacher assigned to course")
            }
            "6" => {
                let teacher_id = self.ask_id("Teacher id")?;
                let course_id = self.ask_id("Course id")?;
                let day = self.ask("Day")?;
                let start = self.ask("Start (HH:MM)")?;
                let end = self.ask("End (HH:MM)")?;
                let slot = self
                    .registry
                    .create_schedule_slot(course_id, teacher_id, &day, &start, &end)?;
                let line = format!("Slot created: id={} {}", slot.id, describe(slot));
                self.say(&line)
            }
            "7" => {
                let course_id = self.ask_id("Course id")?;
                let file = self.ask("CSV file")?;
                let course = self.registry.require_course(course_id)?;
                let students = self.registry.students_in_course(course_id);
                let text = export::students_csv(course, &students);
                export::write_csv(&file, &text)
                    .map_err(|e| CommandError::Input(format!("cannot write {file}: {e}")))?;
                let line = format!("Exported {} student(s) to {file}", students.len());
                self.say(&line)
            }
            "8" => {
                let teacher_id = self.ask_id("Teacher id")?;
                let teacher = self.registry.require_teacher(teacher_id)?;
                let mut lines = vec![format!("Schedule of {}:", teacher.full_name())];
                for slot in self.registry.teacher_schedule(teacher_id) {
                    let course = self
                        .registry
                        .course(slot.course_id)
                        .map_or("?", |c| c.name.as_str());
                    lines.push(format!("  {}  {course}", describe(slot)));
                }
                self.say_all(&lines)
            }
            "9" => {
                let course_id = self.ask_id("Course id")?;
                let course = self.registry.require_course(course_id)?;
                let mut lines = vec![format!("Schedule of {}:", course.name)];
                for slot in self.registry.course_schedule(course_id) {
                    let teacher = self
                        .registry
                        .teacher(slot.teacher_id)
                        .map(|t| t.full_name())
                        .unwrap_or_default();
                    lines.push(format!("  {}  {teacher}", describe(slot)));
                }
                self.say_all(&lines)
            }
            "s" | "S" => {
                let path = match self.data.clone() {
                    Some(path) => path,
                    None => PathBuf::from(self.ask("Snapshot file")?),
                };
                self.save(&path)
            }
            other => Err(CommandError::Input(format!("unknown option '{other}'"))),
        }
    }

    fn save(&mut self, path: &Path) -> Result<(), CommandError> {
        persistence::save_to_path(&self.registry, path)?;
        let line = format!("Saved to {}", path.display());
        self.say(&line)
    }

    /// Prompts and reads one trimmed line.
    fn ask(&mut self, label: &str) -> Result<String, CommandError> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CommandError::Eof);
        }
        Ok(line.trim().to_string())
    }

    fn ask_id(&mut self, label: &str) -> Result<EntityId, CommandError> {
        let text = self.ask(label)?;
        text.parse()
            .map_err(|_| CommandError::Input(format!("'{text}' is not a valid id")))
    }

    fn say(&mut self, line: &str) -> Result<(), CommandError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn say_all(&mut self, lines: &[String]) -> Result<(), CommandError> {
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }
}

fn describe(slot: &ScheduleSlot) -> String {
    format!("{} {}-{}", slot.day, slot.start, slot.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(registry: Registry, script: &str) -> (Registry, String) {
        let mut out = Vec::new();
        let mut console = Console::new(registry, Cursor::new(script.as_bytes()), &mut out, None);
        console.run().unwrap();
        let registry = console.registry;
        (registry, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_create_and_schedule() {
        let script = "2\nLuis\nPaz\n3\nMath\n6\n1\n1\nmon\n08:00\n09:00\n0\n";
        let (reg, out) = run_script(Registry::new(), script);

        assert!(out.contains("Teacher created: 1 Luis Paz"));
        assert!(out.contains("Course created: 1 Math"));
        assert!(out.contains("Slot created: id=1 Monday 08:00-09:00"));
        assert!(out.contains("Bye!"));
        assert_eq!(reg.slots().count(), 1);
    }

    #[test]
    fn test_errors_are_printed_verbatim() {
        let mut reg = Registry::new();
        let math = reg.create_course("Math").id;
        let luis = reg.create_teacher("Luis", "Paz").id;
        reg.create_schedule_slot(math, luis, "Monday", "08:00", "09:00")
            .unwrap();

        let script = "6\n1\n1\nMonday\n08:30\n09:30\n4\n5\n1\n4\nabc\n0\n";
        let (reg, out) = run_script(reg, script);

        assert!(out.contains("error: teacher 1 is already booked on Monday by slot 1"));
        assert!(out.contains("error: student 5 not found"));
        assert!(out.contains("error: 'abc' is not a valid id"));
        assert_eq!(reg.slots().count(), 1);
    }

    #[test]
    fn test_schedule_listing() {
        let mut reg = Registry::new();
        let math = reg.create_course("Math").id;
        let luis = reg.create_teacher("Luis", "Paz").id;
        reg.create_schedule_slot(math, luis, "Wednesday", "10:00", "11:00")
            .unwrap();
        reg.create_schedule_slot(math, luis, "Monday", "08:00", "09:00")
            .unwrap();

        let (_, out) = run_script(reg, "8\n1\n9\n1\n0\n");

        let mon = out.find("Monday 08:00-09:00  Math").unwrap();
        let wed = out.find("Wednesday 10:00-11:00  Math").unwrap();
        assert!(mon < wed);
        assert!(out.contains("Schedule of Math:"));
        assert!(out.contains("Monday 08:00-09:00  Luis Paz"));
    }

    #[test]
    fn test_unknown_option_and_eof() {
        let (_, out) = run_script(Registry::new(), "x\n1\nAna\n");
        assert!(out.contains("error: unknown option 'x'"));
        assert!(!out.contains("Bye!")); // stopped at end of input
    }

    #[test]
    fn test_export_students() {
        let path = std::env::temp_dir().join(format!("school-cli-{}.csv", std::process::id()));
        let script = format!("3\nMath\n1\nAna\nGil\n4\n1\n1\n7\n1\n{}\n0\n", path.display());
        let (_, out) = run_script(Registry::new(), &script);

        assert!(out.contains("Exported 1 student(s)"));
        let csv = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(csv.ends_with("1,Math,1,Ana,Gil\n"));
    }
}
