//! Alignment of hypothesis events against the loaded reference phrase.

use crate::tokenize::{spoken_tokens, tokenize};
use crate::{HypothesisEvent, ReferenceToken, TokenState};

/// Result of feeding one hypothesis event to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOutcome {
    /// The event carried no usable words, or the phrase was already complete.
    Ignored,
    Updated {
        /// Index of the read head after the event (`tokens.len()` once complete).
        cursor: usize,
        /// Whether `recognized_count` moved forward.
        advanced: bool,
        /// Set only on the event that completed the phrase.
        completed: bool,
    },
}

impl AlignOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, AlignOutcome::Ignored)
    }

    pub fn completed(&self) -> bool {
        matches!(self, AlignOutcome::Updated { completed: true, .. })
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            AlignOutcome::Ignored => None,
            AlignOutcome::Updated { cursor, .. } => Some(*cursor),
        }
    }
}

/// Per-phrase alignment state.
///
/// Invariants kept after every operation:
/// - `recognized_count <= cursor <= tokens.len()`
/// - tokens `[0, recognized_count)` are `Recognized`, nothing after is
/// - exactly one token is `InProgress` while the phrase is incomplete
#[derive(Debug, Default)]
pub struct AlignmentEngine {
    tokens: Vec<ReferenceToken>,
    cursor: usize,
    recognized_count: usize,
    completion_reported: bool,
}

impl AlignmentEngine {
    pub fn new(phrase: &str) -> Self {
        let mut engine = Self::default();
        engine.load(phrase);
        engine
    }

    /// Replace the phrase and reset all alignment state.
    pub fn load(&mut self, phrase: &str) {
        self.tokens = tokenize(phrase);
        self.cursor = 0;
        self.recognized_count = 0;
        self.completion_reported = false;

        tracing::debug!(tokens = self.tokens.len(), "phrase_loaded");
    }

    pub fn tokens(&self) -> &[ReferenceToken] {
        &self.tokens
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn recognized_count(&self) -> usize {
        self.recognized_count
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.recognized_count == self.tokens.len()
    }

    /// Token the viewport should keep centred: the read head, or the last
    /// token once the phrase is complete.
    pub fn anchor_index(&self) -> Option<usize> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(self.cursor.min(self.tokens.len() - 1))
        }
    }

    /// Returns `true` exactly once per loaded phrase, the first time it is
    /// called after the phrase became complete.
    ///
    /// An empty phrase is complete as soon as it is loaded.
    pub fn take_completion(&mut self) -> bool {
        if self.is_complete() && !self.completion_reported {
            self.completion_reported = true;
            true
        } else {
            false
        }
    }

    /// Walk one hypothesis against the unconfirmed part of the phrase.
    pub fn on_hypothesis(&mut self, event: &HypothesisEvent) -> AlignOutcome {
        let spoken = spoken_tokens(&event.transcript);
        if spoken.is_empty() {
            tracing::trace!(transcript = %event.transcript, "hypothesis_without_words");
            return AlignOutcome::Ignored;
        }
        if self.is_complete() {
            return AlignOutcome::Ignored;
        }

        let before = self.recognized_count;
        let mut match_index = self.recognized_count;
        let mut spoken_index = 0;
        let mut consumed = 0usize;

        while match_index < self.tokens.len() && spoken_index < spoken.len() {
            let target = self.tokens[match_index].normalized();

            // Tokens without letters ("--", "1982") can't be spoken. They ride
            // along once a word matched, and before that only when the next
            // spoken word is the next lettered token.
            if target.is_empty() {
                if consumed == 0 && !self.next_lettered_is(match_index, &spoken[spoken_index]) {
                    break;
                }
                self.accept(match_index, event.is_final);
                match_index += 1;
                continue;
            }

            let word = &spoken[spoken_index];
            if *word == target {
                self.accept(match_index, event.is_final);
                match_index += 1;
                spoken_index += 1;
                consumed += 1;
            } else if word.len() > 1 && target.starts_with(word.as_str()) {
                self.tokens[match_index].state = TokenState::InProgress;
                spoken_index += 1;
            } else if consumed == 0 {
                break;
            } else if event.is_final {
                tracing::debug!(
                    expected = %target,
                    heard = %word,
                    index = match_index,
                    "forced_advance"
                );
                self.accept(match_index, true);
                match_index += 1;
                spoken_index += 1;
                consumed += 1;
            } else {
                spoken_index += 1;
            }
        }

        if event.is_final && consumed > 0 {
            while match_index < self.tokens.len() && self.tokens[match_index].normalized().is_empty()
            {
                self.accept(match_index, true);
                match_index += 1;
            }
        }

        self.settle_head(match_index);

        let advanced = self.recognized_count > before;
        let completed = self.take_completion();

        tracing::debug!(
            spoken = ?spoken,
            is_final = event.is_final,
            consumed,
            recognized = self.recognized_count,
            cursor = self.cursor,
            "hypothesis_aligned"
        );

        AlignOutcome::Updated {
            cursor: self.cursor,
            advanced,
            completed,
        }
    }

    /// Whether the first lettered token at or after `from` normalizes to `word`.
    fn next_lettered_is(&self, from: usize, word: &str) -> bool {
        self.tokens[from..]
            .iter()
            .map(ReferenceToken::normalized)
            .find(|n| !n.is_empty())
            .is_some_and(|n| n == word)
    }

    fn accept(&mut self, index: usize, is_final: bool) {
        if is_final {
            self.tokens[index].state = TokenState::Recognized;
            self.recognized_count = index + 1;
        } else {
            self.tokens[index].state = TokenState::InProgress;
        }
    }

    /// Reassign every unconfirmed token and place the single read head.
    fn settle_head(&mut self, head: usize) {
        for token in &mut self.tokens[self.recognized_count..] {
            if token.state != TokenState::Recognized {
                token.state = TokenState::Upcoming;
            }
        }

        if self.is_complete() {
            self.cursor = self.tokens.len();
            return;
        }

        // A partial that covers the whole phrase keeps the last word as head.
        let head = head.clamp(self.recognized_count, self.tokens.len() - 1);
        self.tokens[head].state = TokenState::InProgress;
        self.cursor = head;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = "I AM NOT A REPLICANT";

    fn states(engine: &AlignmentEngine) -> Vec<TokenState> {
        engine.tokens().iter().map(|t| t.state).collect()
    }

    fn in_progress_count(engine: &AlignmentEngine) -> usize {
        engine
            .tokens()
            .iter()
            .filter(|t| t.state == TokenState::InProgress)
            .count()
    }

    #[test]
    fn test_fresh_phrase_has_head_at_zero() {
        let engine = AlignmentEngine::new(PHRASE);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.recognized_count(), 0);
        assert_eq!(engine.tokens()[0].state, TokenState::InProgress);
        assert_eq!(in_progress_count(&engine), 1);
    }

    #[test]
    fn test_partial_moves_head_without_recognizing() {
        let mut engine = AlignmentEngine::new(PHRASE);
        let outcome = engine.on_hypothesis(&HypothesisEvent::partial("i am"));

        assert_eq!(outcome.cursor(), Some(2));
        assert_eq!(engine.recognized_count(), 0);
        assert_eq!(engine.tokens()[2].state, TokenState::InProgress);
        assert_eq!(in_progress_count(&engine), 1);
    }

    #[test]
    fn test_final_recognizes_matched_prefix() {
        let mut engine = AlignmentEngine::new(PHRASE);
        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("i am"));

        assert_eq!(
            outcome,
            AlignOutcome::Updated {
                cursor: 2,
                advanced: true,
                completed: false
            }
        );
        assert_eq!(
            states(&engine),
            vec![
                TokenState::Recognized,
                TokenState::Recognized,
                TokenState::InProgress,
                TokenState::Upcoming,
                TokenState::Upcoming,
            ]
        );
    }

    #[test]
    fn test_repeated_utterance_stops_walk_without_consumption() {
        let mut engine = AlignmentEngine::new(PHRASE);
        engine.on_hypothesis(&HypothesisEvent::final_result("i am"));

        // "I" does not match "NOT" and nothing was consumed yet, so the walk stops.
        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("i am definitely not"));

        assert_eq!(outcome.cursor(), Some(2));
        assert_eq!(engine.recognized_count(), 2);
        assert_eq!(engine.tokens()[2].state, TokenState::InProgress);
    }

    #[test]
    fn test_forced_advance_after_consumed_token() {
        let mut engine = AlignmentEngine::new(PHRASE);
        engine.on_hypothesis(&HypothesisEvent::final_result("i am"));

        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("not definitely"));

        // NOT matched, DEFINITELY vs A is forced through.
        assert_eq!(engine.recognized_count(), 4);
        assert_eq!(outcome.cursor(), Some(4));
        assert_eq!(engine.tokens()[3].state, TokenState::Recognized);
        assert_eq!(engine.tokens()[4].state, TokenState::InProgress);
    }

    #[test]
    fn test_final_noise_never_moves_backward_or_forward() {
        let mut engine = AlignmentEngine::new(PHRASE);
        engine.on_hypothesis(&HypothesisEvent::final_result("i am"));

        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("banana"));

        assert_eq!(
            outcome,
            AlignOutcome::Updated {
                cursor: 2,
                advanced: false,
                completed: false
            }
        );
        assert_eq!(engine.recognized_count(), 2);
    }

    #[test]
    fn test_partial_mismatch_skips_spoken_word() {
        let mut engine = AlignmentEngine::new(PHRASE);
        let outcome = engine.on_hypothesis(&HypothesisEvent::partial("i uh am"));

        assert_eq!(outcome.cursor(), Some(2));
        assert_eq!(engine.recognized_count(), 0);
    }

    #[test]
    fn test_prefix_marks_head_tentatively() {
        let mut engine = AlignmentEngine::new(PHRASE);
        engine.on_hypothesis(&HypothesisEvent::final_result("i am not a"));

        let outcome = engine.on_hypothesis(&HypothesisEvent::partial("repli"));
        assert_eq!(outcome.cursor(), Some(4));
        assert_eq!(engine.tokens()[4].state, TokenState::InProgress);
        assert_eq!(engine.recognized_count(), 4);

        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("replicant"));
        assert!(outcome.completed());
        assert_eq!(engine.cursor(), engine.len());
    }

    #[test]
    fn test_single_letter_is_not_a_prefix() {
        let mut engine = AlignmentEngine::new("REPLICANT");
        engine.on_hypothesis(&HypothesisEvent::partial("r"));
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.tokens()[0].state, TokenState::InProgress);
    }

    #[test]
    fn test_partial_covering_whole_phrase_keeps_last_word_as_head() {
        let mut engine = AlignmentEngine::new(PHRASE);
        let outcome = engine.on_hypothesis(&HypothesisEvent::partial("i am not a replicant"));

        assert_eq!(outcome.cursor(), Some(4));
        assert_eq!(engine.recognized_count(), 0);
        assert_eq!(in_progress_count(&engine), 1);
        assert!(!engine.is_complete());
    }

    #[test]
    fn test_partial_is_idempotent() {
        let mut once = AlignmentEngine::new(PHRASE);
        once.on_hypothesis(&HypothesisEvent::final_result("i"));
        once.on_hypothesis(&HypothesisEvent::partial("am no"));

        let mut twice = AlignmentEngine::new(PHRASE);
        twice.on_hypothesis(&HypothesisEvent::final_result("i"));
        twice.on_hypothesis(&HypothesisEvent::partial("am no"));
        twice.on_hypothesis(&HypothesisEvent::partial("am no"));

        assert_eq!(states(&once), states(&twice));
        assert_eq!(once.cursor(), twice.cursor());
        assert_eq!(once.recognized_count(), twice.recognized_count());
    }

    #[test]
    fn test_empty_transcript_is_ignored() {
        let mut engine = AlignmentEngine::new(PHRASE);
        engine.on_hypothesis(&HypothesisEvent::partial("i am"));
        let before = states(&engine);

        assert!(engine.on_hypothesis(&HypothesisEvent::final_result("")).is_ignored());
        assert!(engine.on_hypothesis(&HypothesisEvent::final_result(" ?! ")).is_ignored());
        assert_eq!(states(&engine), before);
        assert_eq!(engine.cursor(), 2);
    }

    #[test]
    fn test_completion_reported_once() {
        let mut engine = AlignmentEngine::new(PHRASE);
        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("i am not a replicant"));
        assert!(outcome.completed());
        assert_eq!(in_progress_count(&engine), 0);

        let again = engine.on_hypothesis(&HypothesisEvent::final_result("replicant"));
        assert!(again.is_ignored());
        assert!(!engine.take_completion());
    }

    #[test]
    fn test_empty_phrase_is_complete_on_load() {
        let mut engine = AlignmentEngine::new("   ");
        assert!(engine.is_complete());
        assert_eq!(engine.anchor_index(), None);
        assert!(engine.take_completion());
        assert!(!engine.take_completion());
    }

    #[test]
    fn test_letterless_tokens_ride_along() {
        let mut engine = AlignmentEngine::new("TEARS -- IN 2019 RAIN");
        engine.on_hypothesis(&HypothesisEvent::final_result("tears in"));
        // "--" and the trailing "2019" are absorbed along with the spoken words.
        assert_eq!(engine.recognized_count(), 4);
        assert_eq!(engine.cursor(), 4);

        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("rain"));
        assert!(outcome.completed());
    }

    #[test]
    fn test_noise_does_not_cross_leading_letterless_token() {
        let mut engine = AlignmentEngine::new("-- HELLO WORLD");

        let outcome = engine.on_hypothesis(&HypothesisEvent::final_result("banana"));
        assert_eq!(engine.recognized_count(), 0);
        assert_eq!(engine.cursor(), 0);
        assert!(!matches!(outcome, AlignOutcome::Updated { advanced: true, .. }));

        engine.on_hypothesis(&HypothesisEvent::partial("banana split"));
        assert_eq!(engine.recognized_count(), 0);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.tokens()[0].state, TokenState::InProgress);
    }

    #[test]
    fn test_leading_letterless_token_crossed_by_matching_word() {
        let mut engine = AlignmentEngine::new("-- 1982 HELLO WORLD");

        engine.on_hypothesis(&HypothesisEvent::partial("hello"));
        assert_eq!(engine.recognized_count(), 0);
        assert_eq!(engine.cursor(), 3);

        engine.on_hypothesis(&HypothesisEvent::final_result("hello"));
        assert_eq!(engine.recognized_count(), 3);
        assert_eq!(engine.tokens()[3].state, TokenState::InProgress);
    }

    #[test]
    fn test_load_resets_state() {
        let mut engine = AlignmentEngine::new(PHRASE);
        engine.on_hypothesis(&HypothesisEvent::final_result("i am not a replicant"));
        assert!(engine.is_complete());

        engine.load("DESCRIBE IN SINGLE WORDS");
        assert_eq!(engine.recognized_count(), 0);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.tokens()[0].state, TokenState::InProgress);
        assert!(!engine.take_completion());
    }

    #[test]
    fn test_anchor_index_clamps_after_completion() {
        let mut engine = AlignmentEngine::new("ONE TWO");
        engine.on_hypothesis(&HypothesisEvent::final_result("one two"));
        assert_eq!(engine.cursor(), 2);
        assert_eq!(engine.anchor_index(), Some(1));
    }
}
