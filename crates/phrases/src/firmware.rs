//! Firmware modules: the question set loaded into the prop.

use crate::error::{PhraseError, PhraseResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class reported for utterances that match no question.
pub const UNCLASSIFIED: &str = "unclassified";

/// Leading characters of a question text an utterance must contain to match.
const TEXT_PREFIX_CHARS: usize = 20;

/// Leading characters of an expected reply an utterance must contain to match.
const REPLY_PREFIX_CHARS: usize = 10;

/// One interview question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Phrase the subject is expected to read aloud.
    pub text: String,
    #[serde(default)]
    pub expected_reply: String,
    /// Share of the overall score, 0.0 to 1.0.
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub class: String,
}

/// A firmware module as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firmware {
    pub profile: String,
    #[serde(default)]
    pub manufacturer: String,
    pub questions: Vec<Question>,
}

impl Firmware {
    /// Load a firmware module from a JSON file.
    pub fn load(path: &Path) -> PhraseResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PhraseError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let firmware = Self::from_json(&content)?;
        tracing::info!(
            profile = %firmware.profile,
            questions = firmware.questions.len(),
            path = %path.display(),
            "firmware loaded"
        );
        Ok(firmware)
    }

    /// Parse firmware JSON (for testing without filesystem).
    pub fn from_json(content: &str) -> PhraseResult<Self> {
        let firmware: Firmware = serde_json::from_str(content)?;
        if firmware.questions.is_empty() {
            return Err(PhraseError::NoPhrases);
        }
        Ok(firmware)
    }

    /// Class of the first question a final utterance belongs to.
    ///
    /// An utterance belongs to a question when the question text contains it,
    /// when it contains the start of the question text, or failing that when
    /// the same holds for the expected reply. Matching is case-insensitive.
    pub fn classify(&self, utterance: &str) -> &str {
        let heard = utterance.trim().to_lowercase();
        if heard.is_empty() {
            return UNCLASSIFIED;
        }

        self.questions
            .iter()
            .find(|q| {
                overlaps(&heard, &q.text, TEXT_PREFIX_CHARS)
                    || overlaps(&heard, &q.expected_reply, REPLY_PREFIX_CHARS)
            })
            .map(|q| q.class.as_str())
            .unwrap_or(UNCLASSIFIED)
    }
}

fn overlaps(heard: &str, reference: &str, prefix_chars: usize) -> bool {
    let reference = reference.to_lowercase();
    if reference.is_empty() {
        return false;
    }

    let prefix: String = reference.chars().take(prefix_chars).collect();
    reference.contains(heard) || heard.contains(prefix.as_str())
}
