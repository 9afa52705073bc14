//! Seedable randomness for node placement and initial colors.
//!
//! Randomness is injected, never ambient: the store owns a [`Spawner`] built
//! from an explicit seed, so tests replay the exact same placements and the
//! wasm shell seeds from the clock. `SmallRng` needs no OS entropy, which
//! also keeps the wasm32 build free of a getrandom dependency.

use crate::model::{Color, Position};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// The fixed recolor palette shown in the node settings popover.
pub const PALETTE: [Color; 14] = [
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0x00, 0x00, 0xff),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0xff, 0x88, 0x00),
    Color::rgb(0x88, 0xff, 0x00),
    Color::rgb(0x00, 0x88, 0xff),
    Color::rgb(0x88, 0x00, 0xff),
    Color::rgb(0xff, 0x00, 0x88),
    Color::rgb(0x00, 0xff, 0x88),
    Color::rgb(0x88, 0x88, 0x88),
    Color::rgb(0x00, 0x00, 0x00),
];

/// The canvas region new nodes land in when no position is given.
const SPAWN_X: Range<f64> = 100.0..900.0;
const SPAWN_Y: Range<f64> = 100.0..500.0;

/// Deterministic source of spawn positions and colors.
pub struct Spawner {
    rng: SmallRng,
}

impl Spawner {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A random position inside the spawn region.
    pub fn position(&mut self) -> Position {
        Position {
            x: self.rng.gen_range(SPAWN_X),
            y: self.rng.gen_range(SPAWN_Y),
        }
    }

    /// A uniformly random 24-bit color.
    pub fn color(&mut self) -> Color {
        Color::rgb(
            self.rng.gen_range(0..=u8::MAX),
            self.rng.gen_range(0..=u8::MAX),
            self.rng.gen_range(0..=u8::MAX),
        )
    }
}
