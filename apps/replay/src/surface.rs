//! Surface that writes the marquee to the log.

use vk_alignment::{ReferenceToken, TokenState};
use vk_session::{MarqueeFrame, MonospaceSurface, Surface};

/// Fixed-pitch layout, rendered as one log line whenever token states change.
pub struct LogSurface {
    layout: MonospaceSurface,
    last_states: Vec<(usize, TokenState)>,
}

impl LogSurface {
    pub fn new(char_width: f32, viewport_width: f32) -> Self {
        Self {
            layout: MonospaceSurface::new(char_width, viewport_width),
            last_states: Vec::new(),
        }
    }

    pub fn frames_presented(&self) -> u64 {
        self.layout.frames_presented()
    }
}

impl Surface for LogSurface {
    fn show_phrase(&mut self, phrase_index: usize, tokens: &[ReferenceToken]) {
        self.layout.show_phrase(phrase_index, tokens);
        self.last_states.clear();
    }

    fn token_center(&self, index: usize) -> Option<f32> {
        self.layout.token_center(index)
    }

    fn viewport_width(&self) -> f32 {
        self.layout.viewport_width()
    }

    fn present(&mut self, frame: &MarqueeFrame) {
        self.layout.present(frame);
        tracing::trace!(offset = frame.offset, "frame");

        if frame.states != self.last_states {
            tracing::info!(
                phrase = frame.phrase_index,
                offset = frame.offset,
                "{}",
                render_line(self.layout.words(), &frame.states)
            );
            self.last_states = frame.states.clone();
        }
    }
}

/// Recognized words as-is, the read head in brackets, upcoming words dotted.
pub fn render_line(words: &[String], states: &[(usize, TokenState)]) -> String {
    states
        .iter()
        .filter_map(|(i, state)| {
            let word = words.get(*i)?;
            Some(match state {
                TokenState::Recognized => word.clone(),
                TokenState::InProgress => format!("[{}]", word),
                TokenState::Upcoming => ".".repeat(word.chars().count()),
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_line() {
        let words: Vec<String> = ["I", "AM", "NOT"].iter().map(|w| w.to_string()).collect();
        let states = vec![
            (0, TokenState::Recognized),
            (1, TokenState::InProgress),
            (2, TokenState::Upcoming),
        ];

        assert_eq!(render_line(&words, &states), "I [AM] ...");
    }
}
