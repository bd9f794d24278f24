#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use matches::*;
pub use path::*;
pub use prefs::*;
pub use scoring::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod matches;
mod path;
mod prefs;
mod scoring;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    /// How many of [`TileColor::ALL`] are in play.
    pub colors: u8,
    pub min_run: u8,
    /// Tiles spawned after every move that does not complete a run.
    pub queue_len: u8,
    /// Tiles spawned on an empty board when a game starts.
    pub initial_tiles: CellCount,
}

impl GameConfig {
    pub const CLASSIC: Self = Self::new_unchecked((8, 8), TileColor::COUNT, MIN_RUN, 3, 3);

    pub const fn new_unchecked(
        size: Coord2,
        colors: u8,
        min_run: u8,
        queue_len: u8,
        initial_tiles: CellCount,
    ) -> Self {
        Self {
            size,
            colors,
            min_run,
            queue_len,
            initial_tiles,
        }
    }

    pub fn new(
        size: Coord2,
        colors: u8,
        min_run: u8,
        queue_len: u8,
        initial_tiles: CellCount,
    ) -> Self {
        let requested = Self::new_unchecked(size, colors, min_run, queue_len, initial_tiles);
        let rows = size.0.clamp(1, Coord::MAX);
        let cols = size.1.clamp(1, Coord::MAX);
        let config = Self::new_unchecked(
            (rows, cols),
            colors.clamp(1, TileColor::COUNT),
            min_run.max(2),
            queue_len.max(1),
            initial_tiles.min(mult(rows, cols)),
        );
        if config != requested {
            log::warn!("config {:?} clamped to {:?}", requested, config);
        }
        config
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}
