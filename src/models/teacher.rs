//! Teacher model.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// A teacher. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Registry-assigned identifier.
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
}

impl Teacher {
    /// Creates a teacher. Names are trimmed.
    pub fn new(id: EntityId, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_full_name() {
        let t = Teacher::new(7, " Marta", "Ruiz ");
        assert_eq!(t.id, 7);
        assert_eq!(t.full_name(), "Marta Ruiz");
    }
}
