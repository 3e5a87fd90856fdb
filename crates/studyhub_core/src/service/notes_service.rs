//! Scratch notes use-case service.
//!
//! # Responsibility
//! - Persist the study notes pad as one string value.
//!
//! # Invariants
//! - Empty notes are legal; no validation applies.

use crate::cell::PersistedCell;
use crate::store::{keys, StoreAdapter};
use std::rc::Rc;

/// Owned state object for the notes pad.
pub struct NotesService {
    notes: PersistedCell<String>,
}

impl NotesService {
    /// Builds the service over the persisted `study-notes` string.
    pub fn new(store: Rc<StoreAdapter>) -> Self {
        Self {
            notes: PersistedCell::new(store, keys::STUDY_NOTES, String::new()),
        }
    }

    /// Snapshot of the current notes text.
    pub fn text(&self) -> String {
        self.notes.get()
    }

    /// Replaces the notes text and writes it through.
    pub fn set_text(&self, text: impl Into<String>) {
        self.notes.set(text.into());
    }
}
