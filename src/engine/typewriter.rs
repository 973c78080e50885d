//! Plain left-to-right typewriter, used when text carries no reveal tags.

use crate::renderer::escape_markup;

#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Typewriter {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    /// Reveal one more character. Returns `true` once everything is visible.
    pub fn tick(&mut self) -> bool {
        self.shown = (self.shown + 1).min(self.chars.len());
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.chars.len()
    }

    pub fn render(&self) -> String {
        let visible: String = self.chars[..self.shown].iter().collect();
        escape_markup(&visible)
    }
}
