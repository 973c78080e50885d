//! Renderer — turns pieces and live blocks into display markup.
//!
//! The renderer is pure. Given the same pieces and block states, it always
//! produces the same string. Output uses the display surface's inline colour
//! markup: `[#rrggbb]text[]` colours a span and `[[` is a literal `[`.

use crate::engine::block::Block;
use crate::types::{Piece, Rgb};

const ESCAPE_OPEN: char = '[';

/// Double every `[` so plain text cannot be read as a colour tag.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text.chars());
    out
}

fn push_escaped(out: &mut String, chars: impl Iterator<Item = char>) {
    for ch in chars {
        if ch == ESCAPE_OPEN {
            out.push(ESCAPE_OPEN);
        }
        out.push(ch);
    }
}

fn push_colored(out: &mut String, color: Rgb, ch: char) {
    out.push_str("[#");
    out.push_str(&color.to_string());
    out.push(']');
    push_escaped(out, std::iter::once(ch));
    out.push_str("[]");
}

/// Convert HSV (hue in degrees, s and v in 0..=1) to RGB.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb::new(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Rainbow hue for index `i` of a block at `elapsed` seconds.
pub fn rainbow_hue(hz: f64, shift_deg: f64, elapsed: f64, i: usize) -> f64 {
    (360.0 * hz * elapsed + i as f64 * shift_deg).rem_euclid(360.0)
}

/// The block's visible text for its current frame.
pub fn current_string(block: &Block) -> String {
    let opts = block.options();
    let blast = block.blast();
    let elapsed = block.elapsed_secs();
    let mut out = String::with_capacity(block.len() * 2);

    for (i, &ch) in block.curr().iter().enumerate() {
        let flash_left = blast.map_or(0, |b| b.flash_left[i]);
        if flash_left > 0 {
            let color = if flash_left % 2 == 0 {
                opts.flash_color_a
            } else {
                opts.flash_color_b
            };
            let glyph = block.overshoot_glyph(i).unwrap_or(block.target()[i]);
            push_colored(&mut out, color, glyph);
        } else if opts.rainbow && !ch.is_whitespace() {
            let hue = rainbow_hue(opts.rainbow_hz, opts.rainbow_shift_deg, elapsed, i);
            push_colored(&mut out, hsv_to_rgb(hue, 1.0, 1.0), ch);
        } else {
            push_escaped(&mut out, std::iter::once(ch));
        }
    }

    out
}

/// Stitch plain pieces and block output back together in source order.
///
/// Animated pieces consume `blocks` in order. If the blocks run out, the
/// piece's own text is shown instead.
pub fn render_pieces(pieces: &[Piece], blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut blocks = blocks.iter();

    for piece in pieces {
        match piece {
            Piece::Plain(text) => push_escaped(&mut out, text.chars()),
            Piece::Animated { text, .. } => match blocks.next() {
                Some(block) => out.push_str(&current_string(block)),
                None => {
                    tracing::warn!(text = %text, "no block for animated piece");
                    push_escaped(&mut out, text.chars());
                }
            },
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Reading markup back (for display surfaces)
// ---------------------------------------------------------------------------

/// A run of text sharing one colour. `None` means the surface default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub color: Option<Rgb>,
    pub text: String,
}

/// Parse renderer output into coloured spans.
///
/// Anything that is not a well-formed `[#rrggbb]`, `[]` or `[[` sequence is
/// kept as literal text.
pub fn parse_markup(markup: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut color: Option<Rgb> = None;
    let mut text = String::new();
    let mut rest = markup;

    let flush = |spans: &mut Vec<Span>, text: &mut String, color: Option<Rgb>| {
        if !text.is_empty() {
            spans.push(Span {
                color,
                text: std::mem::take(text),
            });
        }
    };

    while let Some(open) = rest.find(ESCAPE_OPEN) {
        text.push_str(&rest[..open]);
        let tag = &rest[open..];

        if let Some(after) = tag.strip_prefix("[[") {
            text.push(ESCAPE_OPEN);
            rest = after;
        } else if let Some(after) = tag.strip_prefix("[]") {
            flush(&mut spans, &mut text, color);
            color = None;
            rest = after;
        } else if let Some(c) = tag
            .get(1..8)
            .filter(|t| t.starts_with('#') && tag[8..].starts_with(']'))
            .and_then(Rgb::parse_hex)
        {
            flush(&mut spans, &mut text, color);
            color = Some(c);
            rest = &tag[9..];
        } else {
            text.push(ESCAPE_OPEN);
            rest = &tag[1..];
        }
    }
    text.push_str(rest);
    flush(&mut spans, &mut text, color);

    spans
}

/// The plain text a surface would show, with all colour markup removed.
pub fn strip_markup(markup: &str) -> String {
    parse_markup(markup).into_iter().map(|s| s.text).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::engine::block::{BlastState, BlockParts};
    use crate::engine::markup::split;
    use crate::engine::options::AnimationOptions;

    fn build(text: &str, header: &str) -> Block {
        let mut rng = StdRng::seed_from_u64(5);
        Block::build(text, &AnimationOptions::parse(header), &mut rng)
    }

    #[test]
    fn escapes_open_bracket() {
        assert_eq!(escape_markup("a[b]c"), "a[[b]c");
        assert_eq!(escape_markup("[["), "[[[[");
    }

    #[test]
    fn plain_fast_path_escapes() {
        let mut b = build("[x]", "cycles=0");
        b.run_to_completion(1_000);
        assert_eq!(current_string(&b), "[[x]");
    }

    #[test]
    fn flash_wraps_target_in_color() {
        let b = Block::from_parts(
            BlockParts {
                target: vec!['A'],
                curr: vec!['A'],
                delay: vec![0],
                remaining: vec![0],
                blast: Some(BlastState {
                    flash_left: vec![2],
                    overshoot_left: vec![0],
                    post_lock_hold: vec![0],
                }),
            },
            &AnimationOptions::parse("style=blast flasha=#112233 flashb=445566"),
        )
        .unwrap();
        assert_eq!(current_string(&b), "[#112233]A[]");
    }

    #[test]
    fn rainbow_colors_each_glyph_but_not_spaces() {
        let mut b = build("a b", "rainbow=1 cycles=0 shift=120");
        b.run_to_completion(1_000);
        let out = current_string(&b);
        let spans = parse_markup(&out);
        assert_eq!(strip_markup(&out), "a b");
        assert_eq!(spans.len(), 3);
        assert!(spans[0].color.is_some());
        assert_eq!(spans[1], Span { color: None, text: " ".into() });
        assert_ne!(spans[0].color, spans[2].color);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn rainbow_hue_advances_with_time_and_index() {
        assert_eq!(rainbow_hue(0.5, 18.0, 0.0, 0), 0.0);
        assert_eq!(rainbow_hue(0.5, 18.0, 1.0, 0), 180.0);
        assert_eq!(rainbow_hue(0.5, 18.0, 1.0, 10), 0.0);
    }

    #[test]
    fn renders_pieces_in_order() {
        let pieces = split("[{CRAZY}ab{/CRAZY}] - {CRAZY}cd{/CRAZY}");
        let mut blocks: Vec<Block> = pieces
            .iter()
            .filter_map(|p| p.options().map(|o| (p.text(), o)))
            .map(|(t, o)| {
                let mut rng = StdRng::seed_from_u64(1);
                Block::build(t, o, &mut rng)
            })
            .collect();
        for b in &mut blocks {
            b.run_to_completion(1_000);
        }
        assert_eq!(render_pieces(&pieces, &blocks), "[[ab] - cd");
    }

    #[test]
    fn missing_blocks_fall_back_to_text() {
        let pieces = split("x{CRAZY}[y]{/CRAZY}");
        assert_eq!(render_pieces(&pieces, &[]), "x[[y]");
    }

    #[test]
    fn empty_block_renders_nothing() {
        let pieces = split("<{CRAZY}{/CRAZY}>");
        let blocks = vec![build("", "")];
        assert_eq!(render_pieces(&pieces, &blocks), "<>");
    }

    #[test]
    fn parse_markup_reads_tags_and_escapes() {
        let spans = parse_markup("hi [#ff0000]R[] [[ok] [#zz]");
        assert_eq!(
            spans,
            vec![
                Span { color: None, text: "hi ".into() },
                Span { color: Some(Rgb::new(255, 0, 0)), text: "R".into() },
                Span { color: None, text: " [ok] [#zz]".into() },
            ]
        );
    }

    #[test]
    fn parse_markup_keeps_unterminated_tag() {
        assert_eq!(strip_markup("end [#ff00"), "end [#ff00");
        assert_eq!(strip_markup("["), "[");
    }
}
