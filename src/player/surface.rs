//! Terminal-backed text surface.
//!
//! Stores the latest markup and paints it on demand, so the scheduler can
//! update text many times between two terminal writes.

use std::io::Write;

use anyhow::Result;
use crossterm::{cursor, queue, style, terminal};

use crate::host::TextSurface;
use crate::renderer::parse_markup;
use crate::types::{Color, NamedColor, Rgb, TextStyle};

pub struct TerminalSurface {
    row: u16,
    text: String,
    style: TextStyle,
    dirty: bool,
}

impl TerminalSurface {
    pub fn new(row: u16, style: TextStyle) -> Self {
        TerminalSurface {
            row,
            text: String::new(),
            style,
            dirty: true,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Paint the current text if it changed since the last paint.
    /// Returns whether anything was written.
    pub fn paint(&mut self, out: &mut impl Write) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let base = to_ct_color(&self.style.color);
        let mut y = self.row;
        queue!(
            out,
            cursor::MoveTo(0, y),
            terminal::Clear(terminal::ClearType::FromCursorDown),
        )?;

        for span in parse_markup(&self.text) {
            let mut cs = style::ContentStyle::default();
            cs.foreground_color = Some(span.color.map_or(base, rgb_to_ct));
            for (i, line) in span.text.split('\n').enumerate() {
                if i > 0 {
                    y += 1;
                    queue!(out, cursor::MoveTo(0, y))?;
                }
                if !line.is_empty() {
                    queue!(
                        out,
                        style::PrintStyledContent(style::StyledContent::new(cs, line))
                    )?;
                }
            }
        }

        self.dirty = false;
        Ok(true)
    }
}

impl TextSurface for TerminalSurface {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    fn style(&self) -> &TextStyle {
        &self.style
    }

    fn set_style(&mut self, style: TextStyle) {
        self.style = style;
        self.dirty = true;
    }
}

// ---------------------------------------------------------------------------
// Colour conversion
// ---------------------------------------------------------------------------

pub fn rgb_to_ct(c: Rgb) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => rgb_to_ct(Rgb::new(*r, *g, *b)),
    }
}
