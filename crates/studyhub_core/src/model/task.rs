//! To-do task domain model.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one to-do task.
pub type TaskId = Uuid;

/// One entry of the to-do list.
///
/// Tasks live in insertion order inside a single persisted sequence; the
/// sequence, not the task, is the unit of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable ID used for toggle/delete addressing.
    pub id: TaskId,
    /// Trimmed, non-empty description.
    pub text: String,
    /// Completion flag flipped by toggle.
    pub completed: bool,
}

impl Task {
    /// Creates a task from raw user input.
    ///
    /// # Errors
    /// - `ValidationError::EmptyTaskText` when `text` trims to nothing.
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            text: trimmed.to_string(),
            completed: false,
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
