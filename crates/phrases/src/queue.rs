//! Ordered phrase list with a wrapping active index.

use crate::error::{PhraseError, PhraseResult};
use crate::firmware::Firmware;

/// The phrases the operator cycles through, and which one is on screen.
#[derive(Debug, Clone)]
pub struct PhraseQueue {
    phrases: Vec<String>,
    active_index: usize,
}

impl PhraseQueue {
    /// Build a queue starting at the first phrase.
    ///
    /// # Errors
    ///
    /// Returns `PhraseError::NoPhrases` if `phrases` is empty.
    pub fn new<I, S>(phrases: I) -> PhraseResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(PhraseError::NoPhrases);
        }

        Ok(Self {
            phrases,
            active_index: 0,
        })
    }

    /// One phrase per firmware question, in file order.
    pub fn from_firmware(firmware: &Firmware) -> PhraseResult<Self> {
        Self::new(firmware.questions.iter().map(|q| q.text.clone()))
    }

    pub fn current(&self) -> &str {
        &self.phrases[self.active_index]
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always false; an empty queue cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Move to the next phrase, wrapping to the first past the end.
    pub fn advance(&mut self) -> &str {
        self.active_index = (self.active_index + 1) % self.phrases.len();
        tracing::debug!(index = self.active_index, "phrase_queue_advance");
        self.current()
    }

    /// Move to the previous phrase, wrapping to the last before the start.
    pub fn retreat(&mut self) -> &str {
        self.active_index = self
            .active_index
            .checked_sub(1)
            .unwrap_or(self.phrases.len() - 1);
        tracing::debug!(index = self.active_index, "phrase_queue_retreat");
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> PhraseQueue {
        PhraseQueue::new(["first", "second", "third"]).unwrap()
    }

    #[test]
    fn test_starts_at_first_phrase() {
        let q = queue();
        assert_eq!(q.current(), "first");
        assert_eq!(q.active_index(), 0);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_advance_wraps() {
        let mut q = queue();
        assert_eq!(q.advance(), "second");
        assert_eq!(q.advance(), "third");
        assert_eq!(q.advance(), "first");
        assert_eq!(q.active_index(), 0);
    }

    #[test]
    fn test_retreat_wraps() {
        let mut q = queue();
        assert_eq!(q.retreat(), "third");
        assert_eq!(q.retreat(), "second");
        assert_eq!(q.active_index(), 1);
    }

    #[test]
    fn test_single_phrase_cycles_to_itself() {
        let mut q = PhraseQueue::new(["only"]).unwrap();
        assert_eq!(q.advance(), "only");
        assert_eq!(q.retreat(), "only");
    }

    #[test]
    fn test_empty_queue_rejected() {
        let result = PhraseQueue::new(Vec::<String>::new());
        assert!(matches!(result, Err(PhraseError::NoPhrases)));
    }
}
