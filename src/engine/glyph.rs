//! Glyph categories and their spin rings.
//!
//! Every character belongs to exactly one category. Each animated category
//! owns a fixed cyclic ring; spinning a glyph means stepping to the next ring
//! element, wrapping at the end. `Other` has no ring and never animates.

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGIT: &[u8] = b"0123456789";
const PUNCT: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphCategory {
    Upper,
    Lower,
    Digit,
    Punct,
    Other,
}

impl GlyphCategory {
    pub fn of(ch: char) -> Self {
        match ch {
            'A'..='Z' => GlyphCategory::Upper,
            'a'..='z' => GlyphCategory::Lower,
            '0'..='9' => GlyphCategory::Digit,
            c if c.is_ascii_punctuation() => GlyphCategory::Punct,
            _ => GlyphCategory::Other,
        }
    }

    pub fn ring(self) -> &'static [u8] {
        match self {
            GlyphCategory::Upper => UPPER,
            GlyphCategory::Lower => LOWER,
            GlyphCategory::Digit => DIGIT,
            GlyphCategory::Punct => PUNCT,
            GlyphCategory::Other => &[],
        }
    }

    pub fn ring_len(self) -> usize {
        self.ring().len()
    }

    pub fn is_animated(self) -> bool {
        self != GlyphCategory::Other
    }

    /// Position of `ch` within this category's ring.
    pub fn position(self, ch: char) -> Option<usize> {
        if !ch.is_ascii() {
            return None;
        }
        self.ring().iter().position(|&b| b as char == ch)
    }

    /// Ring element at `index`, wrapping. `None` for `Other`.
    pub fn glyph_at(self, index: usize) -> Option<char> {
        let ring = self.ring();
        if ring.is_empty() {
            return None;
        }
        Some(ring[index % ring.len()] as char)
    }

    /// Steps forward from `from` to `to` along the ring.
    pub fn forward_distance(self, from: char, to: char) -> usize {
        let len = self.ring_len();
        match (self.position(from), self.position(to)) {
            (Some(a), Some(b)) => (b + len - a) % len,
            _ => 0,
        }
    }
}

/// The glyph after `ch` in its own ring. Characters outside every ring are
/// returned unchanged.
pub fn next(ch: char) -> char {
    step(ch, 1)
}

/// The glyph before `ch` in its own ring.
pub fn prev(ch: char) -> char {
    let len = GlyphCategory::of(ch).ring_len();
    step(ch, len.saturating_sub(1))
}

fn step(ch: char, by: usize) -> char {
    let cat = GlyphCategory::of(ch);
    match cat.position(ch) {
        Some(pos) => cat.glyph_at(pos + by).unwrap_or(ch),
        None => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_characters() {
        assert_eq!(GlyphCategory::of('Q'), GlyphCategory::Upper);
        assert_eq!(GlyphCategory::of('q'), GlyphCategory::Lower);
        assert_eq!(GlyphCategory::of('7'), GlyphCategory::Digit);
        assert_eq!(GlyphCategory::of('['), GlyphCategory::Punct);
        assert_eq!(GlyphCategory::of('~'), GlyphCategory::Punct);
        assert_eq!(GlyphCategory::of(' '), GlyphCategory::Other);
        assert_eq!(GlyphCategory::of('é'), GlyphCategory::Other);
    }

    #[test]
    fn punct_ring_covers_ascii_punctuation() {
        assert_eq!(PUNCT.len(), 32);
        assert!(PUNCT.iter().all(|b| (*b as char).is_ascii_punctuation()));
    }

    #[test]
    fn rings_wrap() {
        assert_eq!(next('Z'), 'A');
        assert_eq!(next('z'), 'a');
        assert_eq!(next('9'), '0');
        assert_eq!(next('~'), '!');
        assert_eq!(prev('A'), 'Z');
        assert_eq!(prev('0'), '9');
    }

    #[test]
    fn other_never_moves() {
        assert_eq!(next(' '), ' ');
        assert_eq!(prev('→'), '→');
        assert_eq!(GlyphCategory::Other.glyph_at(3), None);
    }

    #[test]
    fn forward_distance_wraps() {
        assert_eq!(GlyphCategory::Upper.forward_distance('A', 'C'), 2);
        assert_eq!(GlyphCategory::Upper.forward_distance('Y', 'B'), 3);
        assert_eq!(GlyphCategory::Digit.forward_distance('4', '4'), 0);
    }
}
