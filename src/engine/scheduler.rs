//! Frame scheduling: one master tick drives many independently clocked blocks.
//!
//! The master tick fires at the fastest block's fps. A slower block only
//! advances on every `skip`-th master tick, where `skip` is the rounded ratio
//! of the master rate to its own.

use super::block::Block;

/// Master ticks between two advances of a block running at `block_fps`.
pub fn skip_ratio(master_fps: u32, block_fps: u32) -> u64 {
    let ratio = master_fps.max(1) as f64 / block_fps.max(1) as f64;
    (ratio.round() as u64).max(1)
}

/// Run one master tick over `blocks`. Returns `true` once every block is done.
///
/// Each block's subframe counter moves on every tick, done or not.
pub fn drive(blocks: &mut [Block], master_fps: u32) -> bool {
    let mut all_done = true;
    for block in blocks.iter_mut() {
        block.subframe += 1;
        if block.subframe % skip_ratio(master_fps, block.fps) == 0 {
            block.advance();
        }
        all_done &= block.is_done();
    }
    all_done
}
