//! Advances one block by one logical frame.
//!
//! Per index: wait out `delay`, then step through the glyph ring while
//! `remaining` counts down. Reaching zero locks the glyph to its target. In
//! blast style a locked glyph then flashes for `flash_left` frames, spending
//! its overshoot budget alongside, and finally holds briefly to settle.

use super::block::Block;
use super::glyph::{self, GlyphCategory};

/// Frames a blast glyph holds after its flash before it counts as settled.
pub const SETTLE_HOLD_FRAMES: u32 = 2;

impl Block {
    /// Advance by one logical frame. Does nothing to glyphs once done.
    pub fn advance(&mut self) {
        self.frame += 1;

        if let Some(blast) = &mut self.blast {
            for hold in blast.post_lock_hold.iter_mut() {
                *hold = hold.saturating_sub(1);
            }
        }

        if self.done {
            return;
        }

        for i in 0..self.target.len() {
            if self.remaining[i] == 0 {
                self.flash_step(i);
                continue;
            }
            if self.delay[i] > 0 {
                self.delay[i] -= 1;
                continue;
            }
            self.curr[i] = glyph::next(self.curr[i]);
            self.remaining[i] -= 1;
            if self.remaining[i] == 0 {
                self.lock(i);
            }
        }

        self.done = self.compute_done();
        if self.done {
            tracing::trace!(len = self.target.len(), frame = self.frame, "block locked");
        }
    }

    /// Force index `i` onto its target and arm its blast state.
    pub(super) fn lock(&mut self, i: usize) {
        self.curr[i] = self.target[i];
        if !GlyphCategory::of(self.target[i]).is_animated() {
            return;
        }
        let flash_frames = self.options.flash_frames;
        let overshoot = self.options.overshoot;
        if let Some(blast) = &mut self.blast {
            blast.flash_left[i] = flash_frames;
            blast.overshoot_left[i] = overshoot.saturating_mul(2);
            blast.post_lock_hold[i] = 0;
        }
        if flash_frames == 0 {
            self.settle(i);
        }
    }

    fn flash_step(&mut self, i: usize) {
        let Some(blast) = &mut self.blast else {
            return;
        };
        if blast.flash_left[i] == 0 {
            return;
        }
        blast.flash_left[i] -= 1;
        blast.overshoot_left[i] = blast.overshoot_left[i].saturating_sub(1);
        if blast.flash_left[i] == 0 {
            self.settle(i);
        }
    }

    /// Flash finished: drop any unspent overshoot and start the settle hold.
    fn settle(&mut self, i: usize) {
        if let Some(blast) = &mut self.blast {
            blast.overshoot_left[i] = 0;
            blast.post_lock_hold[i] = SETTLE_HOLD_FRAMES;
        }
    }

    /// Glyph to present at `i` while its overshoot budget is being spent:
    /// the next ring glyph for the first half, the previous for the second.
    pub fn overshoot_glyph(&self, i: usize) -> Option<char> {
        let blast = self.blast.as_ref()?;
        let left = *blast.overshoot_left.get(i)?;
        if left == 0 {
            return None;
        }
        let target = self.target[i];
        if left > self.options.overshoot {
            Some(glyph::next(target))
        } else {
            Some(glyph::prev(target))
        }
    }

    /// Drive the block until done, returning the frames it took.
    /// Bounded by `max_frames` so a caller can never spin forever.
    pub fn run_to_completion(&mut self, max_frames: u64) -> u64 {
        let start = self.frame;
        while !self.done && self.frame - start < max_frames {
            self.advance();
        }
        self.frame - start
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::engine::block::{BlastState, BlockParts};
    use crate::engine::options::AnimationOptions;

    fn build(text: &str, header: &str) -> Block {
        let mut rng = StdRng::seed_from_u64(11);
        Block::build(text, &AnimationOptions::parse(header), &mut rng)
    }

    #[test]
    fn converges_to_target() {
        for header in [
            "",
            "style=explode spread=3 origin=middle",
            "style=blast flash=5 overshoot=2 edge=0.7 origin=right",
            "seed=random jitter=8 cycles=0",
        ] {
            let mut b = build("Score: 42 [ok]!", header);
            b.run_to_completion(10_000);
            assert!(b.is_done(), "not done for {header:?}");
            assert_eq!(b.curr_text(), "Score: 42 [ok]!", "header {header:?}");
        }
    }

    #[test]
    fn spins_never_leave_category() {
        let mut b = build("Az9?x", "seed=random cycles=2 jitter=3");
        while !b.is_done() {
            b.advance();
            for (c, t) in b.curr().iter().zip(b.target()) {
                assert_eq!(GlyphCategory::of(*c), GlyphCategory::of(*t));
            }
        }
    }

    #[test]
    fn delay_holds_glyph_still() {
        let mut b = build("ab", "spread=3 cycles=0");
        // index 1 waits three frames before its first step
        let start = b.curr()[1];
        for _ in 0..3 {
            b.advance();
            assert_eq!(b.curr()[1], start);
        }
        b.advance();
        assert_eq!(b.curr()[1], 'b');
    }

    #[test]
    fn ring_wraps_on_spin() {
        let mut b = Block::from_parts(
            BlockParts {
                target: vec!['Z'],
                curr: vec!['Z'],
                delay: vec![0],
                remaining: vec![2],
                blast: None,
            },
            &AnimationOptions::default(),
        )
        .unwrap();
        b.advance();
        assert_eq!(b.curr(), &['A']);
        b.advance();
        assert_eq!(b.curr(), &['Z']);
        assert!(b.is_done());
    }

    #[test]
    fn blast_flash_and_overshoot_drain() {
        let mut b = build("AB", "style=blast fps=60 flash=2 overshoot=1");
        b.run_to_completion(10_000);
        let blast = b.blast().unwrap();
        assert_eq!(blast.flash_left, vec![0, 0]);
        assert_eq!(blast.overshoot_left, vec![0, 0]);
        assert_eq!(b.curr_text(), "AB");
    }

    #[test]
    fn blast_lock_arms_flash_once() {
        let mut b = Block::from_parts(
            BlockParts {
                target: vec!['B'],
                curr: vec!['A'],
                delay: vec![0],
                remaining: vec![1],
                blast: Some(BlastState::new(1)),
            },
            &AnimationOptions::parse("style=blast flash=3 overshoot=1"),
        )
        .unwrap();

        b.advance();
        let blast = b.blast().unwrap();
        assert_eq!(b.curr(), &['B']);
        assert_eq!(blast.flash_left, vec![3]);
        assert_eq!(blast.overshoot_left, vec![2]);
        assert_eq!(b.overshoot_glyph(0), Some('C'));
        assert!(!b.is_done());

        b.advance();
        assert_eq!(b.blast().unwrap().flash_left, vec![2]);
        assert_eq!(b.overshoot_glyph(0), Some('A'));

        b.advance();
        b.advance();
        let blast = b.blast().unwrap();
        assert_eq!(blast.flash_left, vec![0]);
        assert_eq!(blast.post_lock_hold, vec![SETTLE_HOLD_FRAMES]);
        assert!(b.is_done());
        assert!(!b.is_settled());

        b.advance();
        b.advance();
        assert!(b.is_settled());
        assert_eq!(b.curr(), &['B']);
    }

    #[test]
    fn blast_without_flash_settles_at_lock() {
        let mut b = build("Q", "style=blast overshoot=3 cycles=0");
        b.run_to_completion(1_000);
        let blast = b.blast().unwrap();
        assert_eq!(blast.overshoot_left, vec![0]);
        assert!(b.is_done());
    }

    #[test]
    fn advance_after_done_keeps_glyphs() {
        let mut b = build("ok", "cycles=0");
        b.run_to_completion(1_000);
        let frame = b.frame();
        b.advance();
        assert_eq!(b.curr_text(), "ok");
        assert_eq!(b.frame(), frame + 1);
    }
}
