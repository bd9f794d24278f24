use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Shortest run of same-colored tiles that counts as a match.
pub const MIN_RUN: u8 = 5;

/// Tiles placed by a single spawn, with where they landed.
pub type Placed = SmallVec<[(Coord2, TileColor); 4]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnOutcome {
    pub placed: Placed,
    /// Fewer empty cells than requested tiles, some were not placed.
    pub board_full: bool,
}

/// The grid of cells the garden is played on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    occupied: CellCount,
}

impl Board {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            occupied: 0,
        }
    }

    /// Parses a board from one string per row. `.` is an empty cell and `A`
    /// through `F` are tile colors, whitespace is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height: Coord = rows
            .len()
            .try_into()
            .map_err(|_| GameError::InvalidBoardShape)?;
        let mut parsed = Vec::with_capacity(rows.len());
        for row in rows {
            let cells = row
                .chars()
                .filter(|symbol| !symbol.is_whitespace())
                .map(|symbol| Cell::from_symbol(symbol).ok_or(GameError::UnknownTile(symbol)))
                .collect::<Result<Vec<_>>>()?;
            parsed.push(cells);
        }

        let width = parsed.first().map_or(0, Vec::len);
        if height == 0 || width == 0 || parsed.iter().any(|row| row.len() != width) {
            return Err(GameError::InvalidBoardShape);
        }
        let width: Coord = width.try_into().map_err(|_| GameError::InvalidBoardShape)?;

        let mut board = Self::new((height, width));
        for (row, cells) in (0..height).zip(parsed) {
            for (col, cell) in (0..width).zip(cells) {
                board.set((row, col), cell);
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (
            dim.0.try_into().unwrap_or(Coord::MAX),
            dim.1.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn occupied_count(&self) -> CellCount {
        self.occupied
    }

    pub fn empty_count(&self) -> CellCount {
        self.total_cells() - self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Puts `color` on an in-bounds cell, returning what was there before.
    pub fn place(&mut self, coords: Coord2, color: TileColor) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.set(coords, Cell::Tile(color)))
    }

    /// Empties an in-bounds cell, returning what was there before.
    pub fn take(&mut self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.set(coords, Cell::Empty))
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
        self.occupied = 0;
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord2> {
        self.iter_cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(coords, _)| coords)
            .collect()
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| ((row, col), self[(row, col)])))
    }

    pub fn iter_tiles(&self) -> impl Iterator<Item = (Coord2, TileColor)> + '_ {
        self.iter_cells()
            .filter_map(|(coords, cell)| cell.color().map(|color| (coords, color)))
    }

    /// Finds every run of at least [`MIN_RUN`] same-colored tiles.
    pub fn check_matches(&self) -> MatchSet {
        self.check_matches_with(MIN_RUN)
    }

    /// Finds every straight run of at least `min_run` same-colored tiles along
    /// rows, columns and both diagonals. Overlapping runs share positions.
    pub fn check_matches_with(&self, min_run: u8) -> MatchSet {
        let size = self.size();
        let mut matches = MatchSet::new();

        for (start, color) in self.iter_tiles() {
            for delta in LINE_DIRECTIONS {
                // only walk from the first tile of a run
                let continues_run = unapply_delta(start, delta, size)
                    .is_some_and(|prev| self[prev] == Cell::Tile(color));
                if continues_run {
                    continue;
                }

                let mut run: SmallVec<[Coord2; 8]> = SmallVec::new();
                run.push(start);
                let mut cursor = start;
                while let Some(next) = apply_delta(cursor, delta, size) {
                    if self[next] != Cell::Tile(color) {
                        break;
                    }
                    run.push(next);
                    cursor = next;
                }

                if run.len() >= usize::from(min_run) {
                    log::trace!(
                        "run of {} {:?} from {:?} along {:?}",
                        run.len(),
                        color,
                        start,
                        delta
                    );
                    matches.extend(run);
                }
            }
        }

        matches
    }

    /// Empties every matched position and returns how many tiles were removed.
    pub fn resolve_matches(&mut self, matches: &MatchSet) -> CellCount {
        let mut cleared = 0;
        for coords in matches {
            if self.get(coords).is_some_and(Cell::is_occupied) {
                self.set(coords, Cell::Empty);
                cleared += 1;
            }
        }
        cleared
    }

    /// Places `colors` on distinct empty cells chosen uniformly at random.
    ///
    /// When there are fewer empty cells than colors, as many as fit are placed
    /// and the outcome is flagged as `board_full`.
    pub fn spawn_tiles<G>(&mut self, colors: &[TileColor], generator: &mut G) -> SpawnOutcome
    where
        G: TileGenerator + ?Sized,
    {
        let mut free = self.empty_cells();
        let board_full = free.len() < colors.len();
        if board_full {
            log::debug!(
                "board full, requested {} tiles but only {} cells are free",
                colors.len(),
                free.len()
            );
        }

        let mut placed = Placed::new();
        for (i, &color) in colors.iter().enumerate().take(free.len()) {
            // partial Fisher-Yates over the free cells
            let pick = i + generator.pick_index(free.len() - i);
            free.swap(i, pick);
            let coords = free[i];
            self.set(coords, Cell::Tile(color));
            placed.push((coords, color));
        }

        SpawnOutcome { placed, board_full }
    }

    pub(crate) fn iter_orthogonal(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_orthogonal(coords)
    }

    fn set(&mut self, coords: Coord2, cell: Cell) -> Cell {
        let slot = &mut self.cells[coords.to_nd_index()];
        let previous = core::mem::replace(slot, cell);
        match (previous.is_occupied(), cell.is_occupied()) {
            (false, true) => self.occupied += 1,
            (true, false) => self.occupied -= 1,
            _ => {}
        }
        previous
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        for row in 0..rows {
            if row > 0 {
                f.write_str("\n")?;
            }
            for col in 0..cols {
                fmt::Write::write_char(f, self[(row, col)].symbol())?;
            }
        }
        Ok(())
    }
}
