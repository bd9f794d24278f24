use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Colors waiting to be spawned after the next non-matching move.
pub type Upcoming = smallvec::SmallVec<[TileColor; 4]>;

/// Source of randomness for tile colors and spawn positions.
pub trait TileGenerator {
    /// Next color out of the first `palette` colors of [`TileColor::ALL`].
    fn next_color(&mut self, palette: u8) -> TileColor;

    /// Index in `0..bound`, `bound` is never zero.
    fn pick_index(&mut self, bound: usize) -> usize;

    fn next_queue(&mut self, len: u8, palette: u8) -> Upcoming {
        (0..len).map(|_| self.next_color(palette)).collect()
    }
}
