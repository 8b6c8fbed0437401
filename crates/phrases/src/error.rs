//! Error types for phrase loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for phrase operations.
pub type PhraseResult<T> = Result<T, PhraseError>;

/// Errors that can occur while loading firmware or building a queue.
#[derive(Debug, Error)]
pub enum PhraseError {
    /// Failed to read the firmware file.
    #[error("Failed to read firmware file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Firmware JSON did not parse.
    #[error("Invalid firmware JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A queue needs at least one phrase.
    #[error("no reference phrases to display")]
    NoPhrases,
}
