//! Core domain logic for the Study Hub client.
//! This crate is the single source of truth for tool state and persistence
//! invariants; UI layers stay presentational.

pub mod cell;
pub mod db;
pub mod logging;
pub mod model;
pub mod roadmap;
pub mod service;
pub mod store;
pub mod timer;

pub use cell::PersistedCell;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::deck::{Card, Deck, DeckId};
pub use model::task::{Task, TaskId};
pub use model::ValidationError;
pub use roadmap::{RoadmapEvents, RoadmapSignal};
pub use service::deck_service::{CardStep, DeckService};
pub use service::notes_service::NotesService;
pub use service::task_service::TaskListService;
pub use store::{keys, KvBackend, SqliteKvBackend, StoreAdapter, StoreError, StoreResult};
pub use timer::{BreakPolicy, Clock, ManualClock, Mode, PomodoroTimer, SystemClock};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
