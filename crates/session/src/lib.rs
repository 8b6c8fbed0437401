//! Session control for the speech marquee.
//!
//! A [`Session`] owns the phrase queue, the alignment engine and the scroll
//! controller, and decides when the recognizer runs and when the next phrase
//! is due. It is a plain state machine driven by four inputs:
//!
//! - run/stop transitions from the host
//! - hypothesis-source events (transcripts, errors, end-of-stream)
//! - manual operator input (holds, phrase navigation)
//! - presentation ticks
//!
//! [`SessionRuntime`] serializes those inputs onto one tokio task, so the
//! engine and scroller never need locking.
//!
//! # Architecture
//!
//! ```text
//!  run signal ─┐
//!  manual ─────┤                 ┌──────────────┐
//!  source ─────┼─► SessionRuntime ─► Session ───►│ Surface      │
//!  tick ───────┘        (select!)    │   │       └──────────────┘
//!                                    │   └──────► EventBus
//!                       AlignmentEngine, ScrollController, PhraseQueue
//! ```

mod config;
mod controller;
mod input;
mod runtime;
mod source;
mod surface;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, MarqueeConfig, SessionConfig};
pub use controller::Session;
pub use input::ManualInput;
pub use runtime::SessionRuntime;
pub use source::{HypothesisError, HypothesisSink, HypothesisSource, SourceEnvelope, SourceEvent};
pub use surface::{MarqueeFrame, MonospaceSurface, Surface};
