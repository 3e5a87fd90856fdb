//! To-do list use-case service.
//!
//! # Responsibility
//! - CRUD over the ordered, persisted task sequence.
//!
//! # Invariants
//! - Task order is insertion order.
//! - Sequence length grows only through `add_task`, shrinks only through
//!   `delete_task`/`clear_completed`; `toggle_task` never changes it.
//! - Operations on unknown ids are logged no-ops, never errors.

use crate::cell::PersistedCell;
use crate::model::task::{Task, TaskId};
use crate::model::ValidationError;
use crate::store::{keys, StoreAdapter};
use log::debug;
use std::rc::Rc;

/// Owned state object for the to-do tool.
pub struct TaskListService {
    tasks: PersistedCell<Vec<Task>>,
}

impl TaskListService {
    /// Builds the service over the persisted `todo-tasks` sequence.
    pub fn new(store: Rc<StoreAdapter>) -> Self {
        Self {
            tasks: PersistedCell::new(store, keys::TODO_TASKS, Vec::new()),
        }
    }

    /// Appends a new open task and returns its id.
    ///
    /// # Errors
    /// - `ValidationError::EmptyTaskText` when `text` trims to nothing; the
    ///   sequence is left untouched.
    pub fn add_task(&self, text: &str) -> Result<TaskId, ValidationError> {
        let task = Task::new(text)?;
        let id = task.id;
        self.tasks.update(|tasks| {
            let mut next = tasks.clone();
            next.push(task.clone());
            next
        });
        debug!("event=task_add module=tasks status=ok id={id}");
        Ok(id)
    }

    /// Flips the completion flag of the task with `id`; unknown ids are
    /// no-ops.
    pub fn toggle_task(&self, id: TaskId) {
        if !self.contains(id) {
            debug!("event=task_toggle module=tasks status=noop id={id}");
            return;
        }
        self.tasks.update(|tasks| {
            let mut next = tasks.clone();
            if let Some(task) = next.iter_mut().find(|task| task.id == id) {
                task.toggle();
            }
            next
        });
        debug!("event=task_toggle module=tasks status=ok id={id}");
    }

    /// Removes the task with `id`; unknown ids are no-ops.
    pub fn delete_task(&self, id: TaskId) {
        if !self.contains(id) {
            debug!("event=task_delete module=tasks status=noop id={id}");
            return;
        }
        self.tasks
            .update(|tasks| tasks.iter().filter(|task| task.id != id).cloned().collect());
        debug!("event=task_delete module=tasks status=ok id={id}");
    }

    /// Removes every completed task in one persisted write.
    pub fn clear_completed(&self) {
        let removed = self
            .tasks
            .with(|tasks| tasks.iter().filter(|task| task.completed).count());
        if removed == 0 {
            return;
        }
        self.tasks
            .update(|tasks| tasks.iter().filter(|task| !task.completed).cloned().collect());
        debug!("event=task_clear_completed module=tasks status=ok removed={removed}");
    }

    /// Snapshot of the task sequence in insertion order.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.get()
    }

    pub fn len(&self) -> usize {
        self.tasks.with(|tasks| tasks.len())
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.with(|tasks| tasks.is_empty())
    }

    fn contains(&self, id: TaskId) -> bool {
        self.tasks.with(|tasks| tasks.iter().any(|task| task.id == id))
    }
}
