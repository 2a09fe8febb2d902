//! JSON persistence for registry snapshots.
//!
//! Files are pretty-printed UTF-8 JSON of a [`Snapshot`]. Loading always
//! validates before replacing anything, so a bad file never leaves a
//! half-loaded registry behind.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::registry::Registry;
use crate::snapshot::Snapshot;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot rejected with {} problem(s): {}", .0.len(), first_message(.0))]
    Invalid(Vec<ValidationError>),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map_or("", |e| e.message.as_str())
}

/// Serializes a snapshot as pretty JSON.
pub fn to_json(snapshot: &Snapshot) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parses a snapshot from JSON. The result is not validated yet.
pub fn from_json(text: &str) -> Result<Snapshot, PersistenceError> {
    Ok(serde_json::from_str(text)?)
}

/// Writes the registry to `path`, replacing any existing file.
pub fn save_to_path(registry: &Registry, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    save_snapshot(&registry.snapshot(), path)
}

/// Writes an already-taken snapshot to `path`.
pub fn save_snapshot(snapshot: &Snapshot, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    fs::write(path, to_json(snapshot)?)?;
    info!(path = %path.display(), records = snapshot.len(), "snapshot saved");
    Ok(())
}

/// Reads a snapshot file without validating it.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, PersistenceError> {
    let path = path.as_ref();
    let snapshot = from_json(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), records = snapshot.len(), "snapshot read");
    Ok(snapshot)
}

/// Loads `path` into `registry`, replacing its contents.
///
/// On any error the registry is unchanged.
pub fn load_into(
    registry: &mut Registry,
    path: impl AsRef<Path>,
) -> Result<(), PersistenceError> {
    let snapshot = read_snapshot(path)?;
    registry
        .restore(&snapshot)
        .map_err(PersistenceError::Invalid)
}

/// Loads a new registry from `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Registry, PersistenceError> {
    let mut registry = Registry::new();
    load_into(&mut registry, path)?;
    Ok(registry)
}
