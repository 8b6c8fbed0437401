//! Streaming alignment of recognizer hypotheses against a reference phrase.
//!
//! A phrase is split into [`ReferenceToken`]s. Each incoming
//! [`HypothesisEvent`] is walked against the tokens that are not yet
//! confirmed, and every token ends up in exactly one [`TokenState`]:
//!
//! - `Upcoming`: not spoken yet
//! - `InProgress`: the read head, currently being spoken
//! - `Recognized`: confirmed spoken
//!
//! # Example
//!
//! ```
//! use vk_alignment::{AlignmentEngine, HypothesisEvent, TokenState};
//!
//! let mut engine = AlignmentEngine::new("I AM NOT A REPLICANT");
//! engine.on_hypothesis(&HypothesisEvent::final_result("i am"));
//!
//! assert_eq!(engine.recognized_count(), 2);
//! assert_eq!(engine.tokens()[2].state, TokenState::InProgress);
//! ```

mod engine;
mod tokenize;

pub use engine::{AlignOutcome, AlignmentEngine};
pub use tokenize::{normalize, spoken_tokens, tokenize};

use serde::{Deserialize, Serialize};

/// Classification of a single reference word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    Upcoming,
    InProgress,
    Recognized,
}

/// One word of the reference phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceToken {
    /// Upper-cased rendering text, punctuation preserved.
    pub text: String,
    pub state: TokenState,
}

impl ReferenceToken {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            state: TokenState::Upcoming,
        }
    }

    /// Comparison form of the token text.
    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }
}

/// Latest utterance from the speech recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypothesisEvent {
    pub transcript: String,
    pub is_final: bool,
}

impl HypothesisEvent {
    pub fn new(transcript: impl Into<String>, is_final: bool) -> Self {
        Self {
            transcript: transcript.into(),
            is_final,
        }
    }

    /// A partial (non-final) hypothesis that may still change.
    pub fn partial(transcript: impl Into<String>) -> Self {
        Self::new(transcript, false)
    }

    /// A settled hypothesis.
    pub fn final_result(transcript: impl Into<String>) -> Self {
        Self::new(transcript, true)
    }
}
