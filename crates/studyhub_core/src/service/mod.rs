//! Tool-facing use-case services.
//!
//! # Responsibility
//! - Own the per-tool state objects built over persistent cells.
//! - Keep UI layers decoupled from storage details.
//!
//! # Invariants
//! - Each service owns disjoint storage keys; services share no runtime
//!   state with each other.
//! - Mutations persist the full owned value; no partial-write state is
//!   observable.

pub mod deck_service;
pub mod notes_service;
pub mod task_service;
