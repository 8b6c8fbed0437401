//! Rendering surface contract and a fixed-pitch implementation.

use serde::Serialize;
use vk_alignment::{ReferenceToken, TokenState};

/// What the surface draws on one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarqueeFrame {
    pub phrase_index: usize,
    /// Horizontal translation applied to the word strip.
    pub offset: f32,
    /// `(token index, state)` for classification-driven styling.
    pub states: Vec<(usize, TokenState)>,
}

/// The display the marquee renders into.
///
/// Layout belongs to the surface: the session only asks where a token's
/// centre sits along the (unscrolled) strip and how wide the viewport is.
pub trait Surface: Send {
    /// A new phrase is on screen; lay its words out.
    fn show_phrase(&mut self, phrase_index: usize, tokens: &[ReferenceToken]);

    /// Centre of token `index` in strip coordinates.
    fn token_center(&self, index: usize) -> Option<f32>;

    fn viewport_width(&self) -> f32;

    fn present(&mut self, frame: &MarqueeFrame);
}

/// Lays words out on a fixed-pitch strip, one space between words.
#[derive(Debug, Clone)]
pub struct MonospaceSurface {
    char_width: f32,
    viewport_width: f32,
    words: Vec<String>,
    centers: Vec<f32>,
    last_frame: Option<MarqueeFrame>,
    frames_presented: u64,
}

impl MonospaceSurface {
    pub fn new(char_width: f32, viewport_width: f32) -> Self {
        Self {
            char_width,
            viewport_width,
            words: Vec::new(),
            centers: Vec::new(),
            last_frame: None,
            frames_presented: 0,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn last_frame(&self) -> Option<&MarqueeFrame> {
        self.last_frame.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for MonospaceSurface {
    fn show_phrase(&mut self, _phrase_index: usize, tokens: &[ReferenceToken]) {
        self.words = tokens.iter().map(|t| t.text.clone()).collect();
        self.centers.clear();

        let mut x = 0.0;
        for word in &self.words {
            let width = word.chars().count() as f32 * self.char_width;
            self.centers.push(x + width / 2.0);
            x += width + self.char_width;
        }
    }

    fn token_center(&self, index: usize) -> Option<f32> {
        self.centers.get(index).copied()
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn present(&mut self, frame: &MarqueeFrame) {
        self.last_frame = Some(frame.clone());
        self.frames_presented += 1;
    }
}
