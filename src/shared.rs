//! Thread-safe registry handle.
//!
//! Slot creation is a read (conflict scan) followed by a write (insert).
//! Both must happen under one lock, otherwise two concurrent requests for
//! the same teacher could each pass the scan and book overlapping slots.
//! Every method here takes the single exclusive lock for its whole
//! duration, including snapshot and restore.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::RegistryResult;
use crate::models::{EntityId, ScheduleSlot};
use crate::registry::Registry;
use crate::snapshot::Snapshot;
use crate::validation::ValidationResult;

/// Cloneable handle to a registry behind one exclusive lock.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Runs `f` with exclusive access to the registry.
    ///
    /// Use this to group several operations into one atomic unit.
    pub fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    /// See [`Registry::create_schedule_slot`]. Returns a copy of the slot.
    pub fn create_schedule_slot(
        &self,
        course_id: EntityId,
        teacher_id: EntityId,
        day: &str,
        start: &str,
        end: &str,
    ) -> RegistryResult<ScheduleSlot> {
        self.with(|reg| {
            reg.create_schedule_slot(course_id, teacher_id, day, start, end)
                .cloned()
        })
    }

    /// Full copy of the registry contents.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Replaces the registry contents. See [`Registry::restore`].
    pub fn restore(&self, snapshot: &Snapshot) -> ValidationResult {
        self.inner.lock().restore(snapshot)
    }
}
