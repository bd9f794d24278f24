use alloc::collections::VecDeque;

use super::*;

/// Replays scripted colors and spawn picks, falling back to the first color
/// and the first free cell once a script runs out. Useful for replays and
/// tests that need a known board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedTileGenerator {
    colors: VecDeque<TileColor>,
    picks: VecDeque<usize>,
}

impl FixedTileGenerator {
    pub fn new(colors: &[TileColor], picks: &[usize]) -> Self {
        Self {
            colors: colors.iter().copied().collect(),
            picks: picks.iter().copied().collect(),
        }
    }
}

impl TileGenerator for FixedTileGenerator {
    fn next_color(&mut self, _palette: u8) -> TileColor {
        self.colors.pop_front().unwrap_or(TileColor::Rose)
    }

    fn pick_index(&mut self, bound: usize) -> usize {
        self.picks
            .pop_front()
            .unwrap_or(0)
            .min(bound.saturating_sub(1))
    }
}
