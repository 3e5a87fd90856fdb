//! Roadmap collaborator boundary.
//!
//! # Responsibility
//! - Let the embedding UI layer inform core consumers when a roadmap becomes
//!   available or generation fails.
//!
//! # Invariants
//! - The core never calls the roadmap API and never interprets the roadmap
//!   payload; it is carried opaquely.
//! - Dispatch is synchronous and in subscriber registration order.

use log::{debug, warn};
use std::cell::RefCell;

/// Outcome of one roadmap generation attempt, as reported by the embedder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadmapSignal {
    /// A roadmap arrived; the payload is opaque to the core.
    Available(serde_json::Value),
    /// Generation failed with the upstream error message.
    Failed(String),
}

/// Subscription hub connecting the external roadmap fetch layer to core
/// consumers.
#[derive(Default)]
pub struct RoadmapEvents {
    subscribers: RefCell<Vec<Box<dyn Fn(&RoadmapSignal)>>>,
}

impl RoadmapEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback invoked with every signal.
    pub fn subscribe(&self, callback: impl Fn(&RoadmapSignal) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(callback));
    }

    /// Reports a successfully generated roadmap.
    pub fn notify_available(&self, payload: serde_json::Value) {
        debug!("event=roadmap_signal module=roadmap status=available");
        self.dispatch(&RoadmapSignal::Available(payload));
    }

    /// Reports a failed generation attempt.
    pub fn notify_failed(&self, error: impl Into<String>) {
        let error = error.into();
        warn!("event=roadmap_signal module=roadmap status=failed error={error}");
        self.dispatch(&RoadmapSignal::Failed(error));
    }

    fn dispatch(&self, signal: &RoadmapSignal) {
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(signal);
        }
    }
}
