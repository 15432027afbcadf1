//! Routine (project) domain model.
//!
//! # Invariants
//! - `id` is unique across the whole routine tree.
//! - `name` is non-blank after trim.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a routine.
pub type RoutineId = Uuid;

/// Named grouping of todos. Routines nest through `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: RoutineId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Routine>,
}

impl Routine {
    /// Creates a leaf routine with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: RoutineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style helper for assembling nested trees.
    pub fn with_children(mut self, children: Vec<Routine>) -> Self {
        self.children = children;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Routine;

    #[test]
    fn children_default_to_empty_when_missing() {
        let json = r#"{"id":"6f1c1a52-8d0f-4bde-9a7d-1d8e4e3b4c11","name":"Home"}"#;
        let routine: Routine = serde_json::from_str(json).expect("routine json");
        assert_eq!(routine.name, "Home");
        assert!(routine.children.is_empty());
    }
}
