//! Markup splitter for `{CRAZY <options>}BODY{/CRAZY}` tags.
//!
//! Splitting is total: any input becomes a list of pieces, and malformed tags
//! degrade to plain text instead of failing.

use crate::types::Piece;

use super::options::AnimationOptions;

pub const OPEN_TAG: &str = "{CRAZY";
pub const CLOSE_TAG: &str = "{/CRAZY}";
const HEADER_END: char = '}';

/// Whether `text` contains at least one open tag.
pub fn has_markup(text: &str) -> bool {
    text.contains(OPEN_TAG)
}

/// Split `input` into plain and animated pieces, left to right.
pub fn split(input: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut idx = 0;

    while idx < input.len() {
        let rest = &input[idx..];
        let Some(open) = rest.find(OPEN_TAG) else {
            pieces.push(Piece::Plain(rest.to_string()));
            break;
        };

        if open > 0 {
            pieces.push(Piece::Plain(rest[..open].to_string()));
        }
        let tag = &rest[open..];

        let header_start = OPEN_TAG.len();
        let Some(header_len) = tag[header_start..].find(HEADER_END) else {
            tracing::debug!(at = idx + open, "unterminated tag header, keeping as text");
            pieces.push(Piece::Plain(tag.to_string()));
            break;
        };
        let header = &tag[header_start..header_start + header_len];
        let body_start = header_start + header_len + HEADER_END.len_utf8();

        let Some(body_len) = tag[body_start..].find(CLOSE_TAG) else {
            tracing::debug!(at = idx + open, "missing close tag, keeping as text");
            pieces.push(Piece::Plain(tag.to_string()));
            break;
        };

        pieces.push(Piece::Animated {
            text: tag[body_start..body_start + body_len].to_string(),
            options: AnimationOptions::parse(header),
        });
        idx += open + body_start + body_len + CLOSE_TAG.len();
    }

    pieces
}
