//! Tokenization and normalization of reference phrases and transcripts.

use crate::{ReferenceToken, TokenState};

/// Split a reference phrase into upper-cased tokens.
///
/// The first token starts as the read head, so a freshly loaded phrase
/// always has exactly one `InProgress` token. An empty or whitespace-only
/// phrase yields no tokens.
pub fn tokenize(phrase: &str) -> Vec<ReferenceToken> {
    let mut tokens: Vec<ReferenceToken> = phrase
        .split_whitespace()
        .map(|word| ReferenceToken::new(word.to_uppercase()))
        .collect();

    if let Some(first) = tokens.first_mut() {
        first.state = TokenState::InProgress;
    }

    tokens
}

/// Comparison key for a word: upper-cased with everything outside `A-Z` removed.
pub fn normalize(word: &str) -> String {
    word.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase())
        .collect()
}

/// Normalized words of a recognizer transcript, empties dropped.
pub fn spoken_tokens(transcript: &str) -> Vec<String> {
    transcript
        .split_whitespace()
        .map(normalize)
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_uppercases_and_splits_runs() {
        let tokens = tokenize("  I am\tnot   a replicant ");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["I", "AM", "NOT", "A", "REPLICANT"]);
    }

    #[test]
    fn test_tokenize_sets_first_token_in_progress() {
        let tokens = tokenize("describe in single words");
        assert_eq!(tokens[0].state, TokenState::InProgress);
        assert!(tokens[1..].iter().all(|t| t.state == TokenState::Upcoming));
    }

    #[test]
    fn test_tokenize_keeps_punctuation_for_rendering() {
        let tokens = tokenize("mother? let me tell you");
        assert_eq!(tokens[0].text, "MOTHER?");
        assert_eq!(tokens[0].normalized(), "MOTHER");
    }

    #[test]
    fn test_tokenize_empty_phrase() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }

    #[test]
    fn test_normalize_strips_non_letters() {
        assert_eq!(normalize("don't"), "DONT");
        assert_eq!(normalize("Tortoise,"), "TORTOISE");
        assert_eq!(normalize("1982"), "");
        assert_eq!(normalize("--"), "");
    }

    #[test]
    fn test_spoken_tokens_drops_empties() {
        assert_eq!(
            spoken_tokens("you're in a desert - walking"),
            vec!["YOURE", "IN", "A", "DESERT", "WALKING"]
        );
        assert!(spoken_tokens("   ").is_empty());
        assert!(spoken_tokens("... 42 !").is_empty());
    }
}
