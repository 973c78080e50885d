//! Live per-character state of one animated span.
//!
//! A block is built once from an animated `Piece` and then mutated frame by
//! frame by the spinner (see `spinner.rs`). All per-index arrays share the
//! same length `n`; the blast arrays exist only for `style=blast`.

use rand::Rng;
use thiserror::Error;

use super::glyph::GlyphCategory;
use super::options::{AnimationOptions, RevealStyle, SeedFrom};

/// Construction-time failure: the supplied arrays do not describe one span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("{field} has length {actual}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Post-lock state kept only for blast-style blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlastState {
    pub flash_left: Vec<u32>,
    pub overshoot_left: Vec<u32>,
    pub post_lock_hold: Vec<u32>,
}

impl BlastState {
    pub fn new(n: usize) -> Self {
        BlastState {
            flash_left: vec![0; n],
            overshoot_left: vec![0; n],
            post_lock_hold: vec![0; n],
        }
    }
}

/// Raw arrays for `Block::from_parts`.
#[derive(Debug, Clone)]
pub struct BlockParts {
    pub target: Vec<char>,
    pub curr: Vec<char>,
    pub delay: Vec<u32>,
    pub remaining: Vec<u32>,
    pub blast: Option<BlastState>,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub(super) options: AnimationOptions,
    pub(super) target: Vec<char>,
    pub(super) curr: Vec<char>,
    pub(super) delay: Vec<u32>,
    pub(super) remaining: Vec<u32>,
    pub(super) blast: Option<BlastState>,
    pub(super) fps: u32,
    pub(super) subframe: u64,
    pub(super) frame: u64,
    pub(super) done: bool,
}

impl Block {
    /// Build the animation state for `text` under `options`.
    ///
    /// `rng` supplies jitter and, for `seed=random`, the starting glyphs.
    pub fn build(text: &str, options: &AnimationOptions, rng: &mut impl Rng) -> Self {
        let target: Vec<char> = text.chars().collect();
        let n = target.len();
        let origin = options.origin.index(n);
        let inverse_edge_span = 1.0 / n.saturating_sub(1).max(1) as f64;
        let blast = options.style == RevealStyle::Blast;

        let mut curr = Vec::with_capacity(n);
        let mut delay = Vec::with_capacity(n);
        let mut remaining = Vec::with_capacity(n);

        for (i, &t) in target.iter().enumerate() {
            let cat = GlyphCategory::of(t);
            if !cat.is_animated() {
                curr.push(t);
                delay.push(0);
                remaining.push(0);
                continue;
            }

            let ring_len = cat.ring_len();
            let seed_index = match options.seed_from {
                SeedFrom::Fixed => 0,
                SeedFrom::Random => rng.gen_range(0..ring_len),
            };
            let seed = cat.glyph_at(seed_index).unwrap_or(t);

            let distance = i.abs_diff(origin);
            let jitter = if options.jitter_frames > 0 {
                rng.gen_range(0..=options.jitter_frames)
            } else {
                0
            };
            let wave = options.spread.saturating_mul(distance as u32);

            let base = options.cycles as usize * ring_len + cat.forward_distance(seed, t);
            let edge_boost_cycles = if blast {
                (distance as f64 * inverse_edge_span * options.edge_boost * ring_len as f64)
                    .round() as usize
            } else {
                0
            };

            curr.push(seed);
            delay.push(wave.saturating_add(jitter));
            remaining.push((base + edge_boost_cycles) as u32);
        }

        let mut block = Block {
            options: options.clone(),
            target,
            curr,
            delay,
            remaining,
            blast: blast.then(|| BlastState::new(n)),
            fps: options.fps.max(1),
            subframe: 0,
            frame: 0,
            done: false,
        };
        for i in 0..n {
            if block.remaining[i] == 0 {
                block.lock(i);
            }
        }
        block.done = block.compute_done();
        block
    }

    /// Assemble a block from pre-built arrays, rejecting any length mismatch.
    ///
    /// Indices whose `remaining` is already 0 are treated as locked and show
    /// their target; supplied blast state is kept as given.
    pub fn from_parts(parts: BlockParts, options: &AnimationOptions) -> Result<Self, BlockError> {
        let n = parts.target.len();
        check_len("curr", n, parts.curr.len())?;
        check_len("delay", n, parts.delay.len())?;
        check_len("remaining", n, parts.remaining.len())?;
        if let Some(blast) = &parts.blast {
            check_len("flash_left", n, blast.flash_left.len())?;
            check_len("overshoot_left", n, blast.overshoot_left.len())?;
            check_len("post_lock_hold", n, blast.post_lock_hold.len())?;
        }

        let mut curr = parts.curr;
        for i in 0..n {
            if parts.remaining[i] == 0 {
                curr[i] = parts.target[i];
            }
        }

        let mut block = Block {
            options: options.clone(),
            target: parts.target,
            curr,
            delay: parts.delay,
            remaining: parts.remaining,
            blast: parts.blast,
            fps: options.fps.max(1),
            subframe: 0,
            frame: 0,
            done: false,
        };
        block.done = block.compute_done();
        Ok(block)
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn curr(&self) -> &[char] {
        &self.curr
    }

    /// The raw glyphs currently showing, without any markup.
    pub fn curr_text(&self) -> String {
        self.curr.iter().collect()
    }

    pub fn delay(&self) -> &[u32] {
        &self.delay
    }

    pub fn remaining(&self) -> &[u32] {
        &self.remaining
    }

    pub fn blast(&self) -> Option<&BlastState> {
        self.blast.as_ref()
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn subframe(&self) -> u64 {
        self.subframe
    }

    /// Logical frames this block has advanced.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds of animation time this block has lived through.
    pub fn elapsed_secs(&self) -> f64 {
        self.frame as f64 / self.fps as f64
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Done, and every post-flash settle hold has expired.
    pub fn is_settled(&self) -> bool {
        self.done
            && self
                .blast
                .as_ref()
                .is_none_or(|b| b.post_lock_hold.iter().all(|&h| h == 0))
    }

    pub(super) fn compute_done(&self) -> bool {
        self.remaining.iter().all(|&r| r == 0)
            && self
                .blast
                .as_ref()
                .is_none_or(|b| b.flash_left.iter().all(|&f| f == 0))
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), BlockError> {
    if expected == actual {
        Ok(())
    } else {
        Err(BlockError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}

/// Highest fps among `blocks`, floored at 1. Drives the master tick rate.
pub fn max_fps(blocks: &[Block]) -> u32 {
    blocks.iter().map(|b| b.fps).max().unwrap_or(1).max(1)
}
