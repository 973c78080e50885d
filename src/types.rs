//! Shared boundary types for the text-reveal engine.
//!
//! This module defines the data contracts that cross module lines:
//! - Splitter → Block builder (in-memory): `Piece`s carrying parsed options
//! - Engine → display surface: `TextStyle` and the colour primitives

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::options::AnimationOptions;

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// A plain 24-bit colour as written in the inline `[#rrggbb]` markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse a 6-digit hex colour, with or without a leading `#`.
    ///
    /// Returns `None` for anything that is not exactly six hex digits.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style record exposed by a text display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_color")]
    pub color: Color,
}

fn default_font() -> String {
    "terminal".into()
}

fn default_color() -> Color {
    Color::Named(NamedColor::White)
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font: default_font(),
            color: default_color(),
        }
    }
}

// ---------------------------------------------------------------------------
// Splitter → Block builder boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Plain,
    Animated,
}

/// A contiguous span of the original input.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Plain(String),
    Animated {
        text: String,
        options: AnimationOptions,
    },
}

impl Piece {
    pub fn kind(&self) -> PieceKind {
        match self {
            Piece::Plain(_) => PieceKind::Plain,
            Piece::Animated { .. } => PieceKind::Animated,
        }
    }

    /// The literal span text, or the text to reveal for animated spans.
    pub fn text(&self) -> &str {
        match self {
            Piece::Plain(text) | Piece::Animated { text, .. } => text,
        }
    }

    pub fn options(&self) -> Option<&AnimationOptions> {
        match self {
            Piece::Plain(_) => None,
            Piece::Animated { options, .. } => Some(options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_hash_and_mixed_case() {
        assert_eq!(Rgb::parse_hex("#FFe066"), Some(Rgb::new(0xff, 0xe0, 0x66)));
        assert_eq!(Rgb::parse_hex("000000"), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("gg0000"), None);
        assert_eq!(Rgb::parse_hex(""), None);
    }

    #[test]
    fn rgb_displays_lowercase_hex() {
        assert_eq!(Rgb::new(0xAB, 0x01, 0xFF).to_string(), "ab01ff");
    }

    #[test]
    fn text_style_fills_missing_fields() {
        let style: TextStyle = serde_json::from_str(r#"{"color":"cyan"}"#).unwrap();
        assert_eq!(style.font, "terminal");
        assert_eq!(style.color, Color::Named(NamedColor::Cyan));
    }

    #[test]
    fn piece_accessors() {
        let plain = Piece::Plain("hi".into());
        assert_eq!(plain.kind(), PieceKind::Plain);
        assert_eq!(plain.text(), "hi");
        assert!(plain.options().is_none());

        let animated = Piece::Animated {
            text: "42".into(),
            options: AnimationOptions::default(),
        };
        assert_eq!(animated.kind(), PieceKind::Animated);
        assert_eq!(animated.text(), "42");
        assert!(animated.options().is_some());
    }
}
