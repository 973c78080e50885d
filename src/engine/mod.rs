//! Engine — the reveal compiler and driver.
//!
//! Turns raw text with `{CRAZY}` tags into pieces and blocks (a `Reveal`),
//! then drives the reveal frame by frame from a host scheduler, pushing each
//! rendered frame into a text surface.
//!
//! The engine understands time, glyph rings and markup. It never deals with
//! terminals or real clocks.

pub mod block;
pub mod glyph;
pub mod markup;
pub mod options;
pub mod scheduler;
mod spinner;
pub mod typewriter;

use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::host::{Scheduler, SharedSurface, TaskHandle};
use crate::renderer::{self, escape_markup};
use crate::types::Piece;

use block::{Block, max_fps};
pub use spinner::SETTLE_HOLD_FRAMES;
use typewriter::Typewriter;

/// One multi-block reveal: the split pieces plus a block per animated piece.
#[derive(Debug, Clone)]
pub struct Reveal {
    pieces: Vec<Piece>,
    blocks: Vec<Block>,
    master_fps: u32,
}

impl Reveal {
    pub fn new(raw: &str, rng: &mut impl Rng) -> Self {
        let pieces = markup::split(raw);
        let blocks: Vec<Block> = pieces
            .iter()
            .filter_map(|piece| match piece {
                Piece::Animated { text, options } => Some(Block::build(text, options, &mut *rng)),
                Piece::Plain(_) => None,
            })
            .collect();
        let master_fps = max_fps(&blocks);
        Reveal {
            pieces,
            blocks,
            master_fps,
        }
    }

    /// One master tick. Returns `true` once every block is done.
    pub fn tick(&mut self) -> bool {
        scheduler::drive(&mut self.blocks, self.master_fps)
    }

    pub fn render(&self) -> String {
        renderer::render_pieces(&self.pieces, &self.blocks)
    }

    pub fn is_done(&self) -> bool {
        self.blocks.iter().all(Block::is_done)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn master_fps(&self) -> u32 {
        self.master_fps
    }

    /// Period of the master tick.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.master_fps as f64)
    }
}

/// Drives at most one reveal at a time onto a surface.
pub struct RevealEngine {
    rng: StdRng,
    active: Option<TaskHandle>,
}

impl Default for RevealEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealEngine {
    pub fn new() -> Self {
        RevealEngine {
            rng: StdRng::from_entropy(),
            active: None,
        }
    }

    /// Engine with a reproducible RNG for jitter and random seeding.
    pub fn with_seed(seed: u64) -> Self {
        RevealEngine {
            rng: StdRng::seed_from_u64(seed),
            active: None,
        }
    }

    /// Whether a reveal started by this engine is still scheduled.
    pub fn is_active(&self, sched: &dyn Scheduler) -> bool {
        self.active.is_some_and(|h| sched.is_pending(h))
    }

    /// Stop the in-flight reveal, leaving the surface text as it is.
    pub fn cancel(&mut self, sched: &mut dyn Scheduler) {
        if let Some(handle) = self.active.take() {
            if sched.is_pending(handle) {
                sched.cancel(handle);
                tracing::debug!("reveal cancelled");
            }
        }
    }

    /// Type `text` out left to right at `chars_per_second`.
    ///
    /// A non-positive or non-finite rate shows the whole text at once.
    pub fn reveal_plain(
        &mut self,
        sched: &mut dyn Scheduler,
        surface: SharedSurface,
        text: &str,
        chars_per_second: f64,
    ) {
        self.cancel(sched);

        let mut typewriter = Typewriter::new(text);
        if typewriter.is_done() || !(chars_per_second.is_finite() && chars_per_second > 0.0) {
            surface.borrow_mut().set_text(escape_markup(text));
            return;
        }

        surface.borrow_mut().set_text(typewriter.render());
        let interval = Duration::from_secs_f64(1.0 / chars_per_second);
        let task_surface = Rc::clone(&surface);
        let handle = sched.schedule(
            interval,
            Some(interval),
            Box::new(move || {
                let done = typewriter.tick();
                task_surface.borrow_mut().set_text(typewriter.render());
                if done {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }),
        );
        self.active = Some(handle);
    }

    /// Reveal `raw`, animating any `{CRAZY}` spans; falls back to
    /// `reveal_plain` when the text has no tags.
    pub fn reveal_auto(
        &mut self,
        sched: &mut dyn Scheduler,
        surface: SharedSurface,
        raw: &str,
        chars_per_second: f64,
    ) {
        if !markup::has_markup(raw) {
            self.reveal_plain(sched, surface, raw, chars_per_second);
            return;
        }
        let reveal = Reveal::new(raw, &mut self.rng);
        self.start(sched, surface, reveal);
    }

    /// Drive an already-built reveal.
    pub fn start(&mut self, sched: &mut dyn Scheduler, surface: SharedSurface, mut reveal: Reveal) {
        self.cancel(sched);

        tracing::debug!(
            pieces = reveal.pieces.len(),
            blocks = reveal.blocks.len(),
            master_fps = reveal.master_fps,
            "starting reveal"
        );
        surface.borrow_mut().set_text(reveal.render());
        if reveal.is_done() {
            return;
        }

        let interval = reveal.frame_interval();
        let task_surface = Rc::clone(&surface);
        let handle = sched.schedule(
            interval,
            Some(interval),
            Box::new(move || {
                let done = reveal.tick();
                task_surface.borrow_mut().set_text(reveal.render());
                if done {
                    tracing::debug!("reveal complete");
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }),
        );
        self.active = Some(handle);
    }
}
