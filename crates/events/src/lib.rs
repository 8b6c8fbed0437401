//! Event contracts published by the marquee session.
//!
//! The session never talks to other windows or panels directly. It publishes
//! terminal state transitions as [`MarqueeEvent`]s on an [`EventBus`], and
//! whoever hosts the session decides where they go (a cross-window
//! broadcaster, a log, a test recorder).

mod bus;

pub use bus::{EventBus, EventBusRef, InMemoryEventBus, NullEventBus, TracingEventBus};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the session reports to the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarqueeEvent {
    /// The run signal went high and the marquee is live.
    SessionStarted {
        session_id: Uuid,
        phrase_index: usize,
        ts_ms: i64,
    },
    /// The run signal went low.
    SessionStopped { session_id: Uuid, ts_ms: i64 },
    /// A phrase was put on screen.
    PhraseLoaded {
        phrase_index: usize,
        text: String,
        token_count: usize,
    },
    /// Every word of the phrase was recognized.
    PhraseComplete {
        phrase_index: usize,
        text: String,
        token_count: usize,
        ts_ms: i64,
    },
    /// A settled utterance and the question class it was matched to.
    RecognitionFinal {
        transcript: String,
        class: String,
        ts_ms: i64,
    },
    /// The recognizer reported a recoverable error.
    RecognitionError { message: String },
    /// The recognizer is unavailable; the marquee is display-only.
    RecognitionDegraded { reason: String },
}

impl MarqueeEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            MarqueeEvent::SessionStarted { .. } => event_names::SESSION_STARTED,
            MarqueeEvent::SessionStopped { .. } => event_names::SESSION_STOPPED,
            MarqueeEvent::PhraseLoaded { .. } => event_names::PHRASE_LOADED,
            MarqueeEvent::PhraseComplete { .. } => event_names::PHRASE_COMPLETE,
            MarqueeEvent::RecognitionFinal { .. } => event_names::RECOGNITION_FINAL,
            MarqueeEvent::RecognitionError { .. } => event_names::RECOGNITION_ERROR,
            MarqueeEvent::RecognitionDegraded { .. } => event_names::RECOGNITION_DEGRADED,
        }
    }
}

/// Milliseconds since the Unix epoch, for event timestamps.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const SESSION_STARTED: &str = "session:started";
    pub const SESSION_STOPPED: &str = "session:stopped";
    pub const PHRASE_LOADED: &str = "phrase:loaded";
    pub const PHRASE_COMPLETE: &str = "phrase:complete";
    pub const RECOGNITION_FINAL: &str = "recognition:final";
    pub const RECOGNITION_ERROR: &str = "recognition:error";
    pub const RECOGNITION_DEGRADED: &str = "recognition:degraded";
}
