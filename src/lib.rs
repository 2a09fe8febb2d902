//! School scheduling registry.
//!
//! Keeps students, teachers, courses and weekly schedule slots in memory
//! and guarantees that no teacher is ever double-booked.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Student`, `Teacher`, `Course`,
//!   `ScheduleSlot`, `Weekday`, `ClockTime`, `TimeWindow`
//! - **`registry`**: The `Registry` with creation, assignment, slot
//!   scheduling and schedule queries
//! - **`validation`**: Snapshot integrity checks (duplicate IDs, dangling
//!   references, bad times, overlapping slots)
//! - **`snapshot`** / **`persistence`**: Plain-record snapshot and its JSON file format
//! - **`export`**: CSV rendering of query results
//! - **`shared`**: Single-lock handle for use across threads
//!
//! # Example
//!
//! ```
//! use school_schedule::{Registry, RegistryError};
//!
//! let mut reg = Registry::new();
//! let math = reg.create_course("Math").id;
//! let luis = reg.create_teacher("Luis", "Paz").id;
//!
//! reg.create_schedule_slot(math, luis, "Monday", "08:00", "09:00").unwrap();
//! assert!(matches!(
//!     reg.create_schedule_slot(math, luis, "Monday", "08:30", "09:30"),
//!     Err(RegistryError::Conflict { .. })
//! ));
//! // Back-to-back is fine.
//! reg.create_schedule_slot(math, luis, "Monday", "09:00", "10:00").unwrap();
//! ```

pub mod error;
pub mod export;
pub mod models;
pub mod persistence;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod validation;

pub use error::{EntityKind, InvalidInput, RegistryError, RegistryResult};
pub use registry::Registry;
pub use shared::SharedRegistry;
pub use snapshot::{SlotRecord, Snapshot};
