//! Reference phrases for the speech marquee.
//!
//! Phrases come from a firmware module (a JSON file listing the interview
//! questions) and are cycled through by a [`PhraseQueue`].

mod error;
mod firmware;
mod queue;

pub use error::{PhraseError, PhraseResult};
pub use firmware::{Firmware, Question, UNCLASSIFIED};
pub use queue::PhraseQueue;
