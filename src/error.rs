//! Registry error types.
//!
//! Every failure leaves the registry unchanged, so all of these are
//! recoverable: the caller may retry with corrected input.

use std::fmt;

use thiserror::Error;

use crate::models::{ClockTime, EntityId, Weekday};

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Student,
    Teacher,
    Course,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Student => "student",
            EntityKind::Teacher => "teacher",
            EntityKind::Course => "course",
        })
    }
}

/// Why a slot request was rejected before any conflict check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("unknown day '{0}', expected one of Monday..Sunday")]
    UnknownDay(String),
    #[error("invalid time '{0}', use HH:MM (24h), e.g. 08:30")]
    MalformedTime(String),
    #[error("start time {start} must be before end time {end}")]
    EmptyInterval { start: ClockTime, end: ClockTime },
}

/// Errors returned by [`Registry`](crate::Registry) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },
    #[error("invalid input: {reason}")]
    InvalidInput { reason: InvalidInput },
    #[error("teacher {teacher_id} is already booked on {day} by slot {existing_slot_id}")]
    Conflict {
        teacher_id: EntityId,
        day: Weekday,
        existing_slot_id: EntityId,
    },
}

impl RegistryError {
    pub(crate) fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }
}

impl From<InvalidInput> for RegistryError {
    fn from(reason: InvalidInput) -> Self {
        Self::InvalidInput { reason }
    }
}
