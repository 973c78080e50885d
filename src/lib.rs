//! Animated "crazy" text reveals.
//!
//! Text carrying `{CRAZY key=value ...}BODY{/CRAZY}` tags is split into
//! pieces, each tagged body spins its glyphs toward the target string, and
//! the renderer stitches everything back into one colour-markup string for a
//! display surface.

pub mod config;
pub mod engine;
pub mod host;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod types;
