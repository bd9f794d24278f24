use rand::prelude::*;

use super::*;

/// Uniform colors and positions from a seeded small RNG.
#[derive(Clone, Debug)]
pub struct RandomTileGenerator {
    rng: SmallRng,
}

impl RandomTileGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TileGenerator for RandomTileGenerator {
    fn next_color(&mut self, palette: u8) -> TileColor {
        let palette = palette.clamp(1, TileColor::COUNT);
        let index = self.rng.random_range(0..palette);
        TileColor::ALL[usize::from(index)]
    }

    fn pick_index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound.max(1))
    }
}
