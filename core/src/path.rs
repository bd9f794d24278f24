use alloc::collections::VecDeque;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells a tile travels through, from its source to its destination inclusive.
pub type Path = Vec<Coord2>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The tile was moved along the path.
    Moved(Path),
    /// No chain of empty cells connects source and destination.
    NoPath,
    /// There is no tile at the source.
    SourceEmpty,
    /// The destination already holds a tile.
    DestinationOccupied,
}

impl MoveOutcome {
    pub const fn has_update(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

impl Board {
    /// Breadth-first search for the shortest orthogonal path from `from` to
    /// `to` that steps only on empty cells. `from` itself may be occupied.
    pub fn find_path(&self, from: Coord2, to: Coord2) -> Option<Path> {
        let from = self.validate_coords(from).ok()?;
        let to = self.validate_coords(to).ok()?;
        if from == to || self[to].is_occupied() {
            return None;
        }

        let mut came_from: Array2<Option<Coord2>> =
            Array2::from_elem(self.size().to_nd_index(), None);
        came_from[from.to_nd_index()] = Some(from);
        let mut to_visit = VecDeque::from([from]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if visit_coords == to {
                let mut path = Vec::new();
                let mut cursor = to;
                while cursor != from {
                    path.push(cursor);
                    cursor = came_from[cursor.to_nd_index()]?;
                }
                path.push(from);
                path.reverse();
                log::trace!("path {:?} -> {:?}: {:?}", from, to, path);
                return Some(path);
            }

            for next in self.iter_orthogonal(visit_coords) {
                if came_from[next.to_nd_index()].is_some() || self[next].is_occupied() {
                    continue;
                }
                came_from[next.to_nd_index()] = Some(visit_coords);
                to_visit.push_back(next);
            }
        }

        log::trace!("no path {:?} -> {:?}", from, to);
        None
    }

    /// Moves the tile at `from` to the empty cell `to` if a path of empty cells
    /// connects them. The board is untouched unless the outcome is `Moved`.
    pub fn attempt_move(&mut self, from: Coord2, to: Coord2) -> Result<MoveOutcome> {
        let from = self.validate_coords(from)?;
        let to = self.validate_coords(to)?;

        let Cell::Tile(color) = self[from] else {
            return Ok(MoveOutcome::SourceEmpty);
        };
        if self[to].is_occupied() {
            return Ok(MoveOutcome::DestinationOccupied);
        }

        let Some(path) = self.find_path(from, to) else {
            return Ok(MoveOutcome::NoPath);
        };

        self.take(from)?;
        self.place(to, color)?;
        Ok(MoveOutcome::Moved(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn path_goes_around_walls() {
        let board = board(&[
            "A.B.", //
            "..B.",
            "B...",
            "....",
        ]);

        let path = board.find_path((0, 0), (0, 3)).unwrap();

        // the wall forces a detour through the third row
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(0, 3)));
        assert_eq!(path.len(), 8);
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(a.0.abs_diff(b.0) + a.1.abs_diff(b.1), 1);
            assert!(board[b].is_empty());
        }
    }

    #[test]
    fn path_is_shortest() {
        let board = board(&[
            "A...", //
            "....",
            "....",
            "....",
        ]);

        let path = board.find_path((0, 0), (3, 3)).unwrap();

        assert_eq!(path.len(), 7);
    }

    #[test]
    fn walled_in_tile_has_no_path() {
        let board = board(&[
            "AB..", //
            "B...",
            "....",
            "....",
        ]);

        assert_eq!(board.find_path((0, 0), (3, 3)), None);
    }

    #[test]
    fn diagonal_gaps_do_not_connect() {
        let mut board = board(&[
            "A.B", //
            "CB.",
            "...",
        ]);

        assert_eq!(board.attempt_move((0, 0), (2, 2)).unwrap(), MoveOutcome::NoPath);
        assert_eq!(board[(0, 0)], Cell::Tile(TileColor::Rose));
    }

    #[test]
    fn move_relocates_tile_and_keeps_count() {
        let mut board = board(&[
            "A...", //
            ".B..",
            "....",
            "....",
        ]);
        let occupied = board.occupied_count();

        let outcome = board.attempt_move((0, 0), (2, 1)).unwrap();

        assert!(outcome.has_update());
        assert_eq!(board[(0, 0)], Cell::Empty);
        assert_eq!(board[(2, 1)], Cell::Tile(TileColor::Rose));
        assert_eq!(board.occupied_count(), occupied);
    }

    #[test]
    fn adjacent_move_has_two_step_path() {
        let mut board = board(&["A.", ".."]);

        let outcome = board.attempt_move((0, 0), (0, 1)).unwrap();

        assert_eq!(outcome, MoveOutcome::Moved(vec![(0, 0), (0, 1)]));
    }

    #[test]
    fn preconditions_are_outcomes() {
        let mut board = board(&["AB", ".."]);

        assert_eq!(board.attempt_move((1, 0), (1, 1)), Ok(MoveOutcome::SourceEmpty));
        assert_eq!(board.attempt_move((0, 0), (0, 1)), Ok(MoveOutcome::DestinationOccupied));
        assert_eq!(board.attempt_move((0, 0), (0, 0)), Ok(MoveOutcome::DestinationOccupied));
        assert_eq!(board.attempt_move((0, 0), (2, 0)), Err(GameError::InvalidCoords));
    }
}
