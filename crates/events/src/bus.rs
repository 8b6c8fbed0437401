//! Event bus abstraction for decoupled event publishing.
//!
//! The session publishes through this trait so it can run headless, under
//! test, or behind a cross-window broadcaster without knowing which.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::MarqueeEvent;

/// Receiver of published marquee events.
pub trait EventBus: Send + Sync {
    fn publish(&self, event: MarqueeEvent);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// In-memory event bus for testing.
///
/// Captures all published events for later inspection.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<MarqueeEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<MarqueeEvent>> {
        // Poisoning means a publisher panicked; the captured list is still intact.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All captured events, oldest first.
    pub fn events(&self) -> Vec<MarqueeEvent> {
        self.guard().clone()
    }

    /// Captured events for one topic (see [`crate::event_names`]).
    pub fn events_for(&self, topic: &str) -> Vec<MarqueeEvent> {
        self.guard()
            .iter()
            .filter(|e| e.topic() == topic)
            .cloned()
            .collect()
    }

    pub fn count_for(&self, topic: &str) -> usize {
        self.guard().iter().filter(|e| e.topic() == topic).count()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn publish(&self, event: MarqueeEvent) {
        self.guard().push(event);
    }
}

/// Discards every event.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn publish(&self, _event: MarqueeEvent) {}
}

/// Writes every event to the `tracing` log as a JSON payload.
pub struct TracingEventBus;

impl EventBus for TracingEventBus {
    fn publish(&self, event: MarqueeEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::info!(topic = event.topic(), %payload, "event"),
            Err(e) => tracing::warn!(topic = event.topic(), "Failed to serialize event: {}", e),
        }
    }
}
