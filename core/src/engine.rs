use alloc::vec::Vec;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> TileSelected
/// - TileSelected -> Idle | TileSelected | Processing
/// - Processing -> Idle | GameOver
/// - GameOver -> Idle, only through [`PlayEngine::reset`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Idle,
    TileSelected(Coord2),
    /// A move was accepted and its turn is waiting for [`PlayEngine::finish_turn`].
    Processing,
    GameOver,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver)
    }

    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Processing)
    }

    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Idle | Self::TileSelected(_))
    }

    pub const fn selected(self) -> Option<Coord2> {
        match self {
            Self::TileSelected(coords) => Some(coords),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    Selected(Coord2),
    Deselected,
    /// The selected tile could not reach the chosen cell.
    Rejected,
    /// A turn was played, see [`PlayEngine::last_turn`].
    Moved,
    /// Input arrived while a turn was still processing.
    Ignored,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            NoChange => false,
            Selected(_) => true,
            Deselected => true,
            Rejected => true,
            Moved => true,
            Ignored => false,
        }
    }
}

/// One stage of a turn, in the order it happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurnStep {
    Moved { path: Path },
    Cleared { positions: MatchSet, points: u32 },
    Spawned { tiles: Placed },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub steps: Vec<TurnStep>,
    pub points: u32,
    /// Set when a spawn could not place every tile or left no empty cell.
    pub board_full: bool,
}

impl TurnReport {
    pub fn path(&self) -> Option<&Path> {
        self.steps.iter().find_map(|step| match step {
            TurnStep::Moved { path } => Some(path),
            _ => None,
        })
    }

    pub fn matched(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, TurnStep::Cleared { .. }))
    }

    pub fn cleared(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.steps.iter().flat_map(|step| {
            let positions = match step {
                TurnStep::Cleared { positions, .. } => Some(positions.iter()),
                _ => None,
            };
            positions.into_iter().flatten()
        })
    }

    pub fn spawned(&self) -> impl Iterator<Item = (Coord2, TileColor)> + '_ {
        self.steps.iter().flat_map(|step| {
            let tiles: &[(Coord2, TileColor)] = match step {
                TurnStep::Spawned { tiles } => tiles,
                _ => &[],
            };
            tiles.iter().copied()
        })
    }
}

/// A single game session: board, selection, upcoming queue and score.
#[derive(Clone, Debug)]
pub struct PlayEngine<G = RandomTileGenerator> {
    config: GameConfig,
    board: Board,
    upcoming: Upcoming,
    score: Saturating<u32>,
    state: EngineState,
    last_turn: Option<TurnReport>,
    generator: G,
}

impl PlayEngine<RandomTileGenerator> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RandomTileGenerator::new(seed))
    }
}

impl<G: TileGenerator> PlayEngine<G> {
    /// Starts a game with a freshly spawned board.
    pub fn new(config: GameConfig, generator: G) -> Self {
        let mut engine = Self {
            config,
            board: Board::new(config.size),
            upcoming: Upcoming::new(),
            score: Saturating(0),
            state: Default::default(),
            last_turn: None,
            generator,
        };
        engine.start();
        engine
    }

    /// Resumes play on an existing board. An empty `upcoming` draws a new queue.
    pub fn from_board(
        config: GameConfig,
        board: Board,
        upcoming: &[TileColor],
        mut generator: G,
    ) -> Result<Self> {
        if board.size() != config.size {
            return Err(GameError::InvalidBoardShape);
        }

        let upcoming = if upcoming.is_empty() {
            generator.next_queue(config.queue_len, config.colors)
        } else {
            upcoming.iter().copied().collect()
        };
        let state = if board.is_full() {
            EngineState::GameOver
        } else {
            EngineState::Idle
        };

        Ok(Self {
            config,
            board,
            upcoming,
            score: Saturating(0),
            state,
            last_turn: None,
            generator,
        })
    }

    /// Empties the board and starts over, the only way out of `GameOver`.
    pub fn reset(&mut self) {
        log::debug!("new game, final score was {}", self.score.0);
        self.start();
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    pub fn upcoming(&self) -> &[TileColor] {
        &self.upcoming
    }

    pub fn score(&self) -> u32 {
        self.score.0
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn selected(&self) -> Option<Coord2> {
        self.state.selected()
    }

    pub fn last_turn(&self) -> Option<&TurnReport> {
        self.last_turn.as_ref()
    }

    /// Whether selecting `coords` right now could change anything.
    pub fn can_select(&self, coords: Coord2) -> bool {
        if !self.state.accepts_input() {
            return false;
        }
        match self.board.get(coords) {
            Some(Cell::Tile(_)) => true,
            Some(Cell::Empty) => self.selected().is_some(),
            None => false,
        }
    }

    /// Handles a click on `coords`.
    ///
    /// Clicking a tile selects it, or clears the selection if it was already
    /// selected. Clicking an empty cell with a tile selected tries to move it
    /// there and, if a path exists, plays out the whole turn.
    pub fn select(&mut self, coords: Coord2) -> Result<SelectOutcome> {
        use EngineState::*;
        use SelectOutcome::*;

        let coords = self.board.validate_coords(coords)?;

        Ok(match (self.state, self.board[coords]) {
            (GameOver, _) => return Err(GameError::AlreadyEnded),
            (Processing, _) => {
                log::trace!("ignoring {:?} while processing", coords);
                Ignored
            }
            (TileSelected(selected), Cell::Tile(_)) if selected == coords => {
                self.state = Idle;
                Deselected
            }
            (Idle | TileSelected(_), Cell::Tile(_)) => {
                self.state = TileSelected(coords);
                Selected(coords)
            }
            (Idle, Cell::Empty) => NoChange,
            (TileSelected(selected), Cell::Empty) => {
                match self.board.attempt_move(selected, coords)? {
                    MoveOutcome::Moved(path) => {
                        let report = self.play_turn(path);
                        log::debug!(
                            "turn {:?} -> {:?}: +{} points, board full: {}",
                            selected,
                            coords,
                            report.points,
                            report.board_full
                        );
                        self.last_turn = Some(report);
                        self.state = Processing;
                        Moved
                    }
                    outcome => {
                        log::debug!("move {:?} -> {:?} rejected: {:?}", selected, coords, outcome);
                        self.state = Idle;
                        Rejected
                    }
                }
            }
        })
    }

    /// Ends the turn that is processing, returning the state input resumes in.
    pub fn finish_turn(&mut self) -> EngineState {
        if self.state.is_processing() {
            let board_full = self.last_turn.as_ref().is_some_and(|turn| turn.board_full);
            self.state = if board_full {
                log::debug!("game over with {} points", self.score.0);
                EngineState::GameOver
            } else {
                EngineState::Idle
            };
        }
        self.state
    }

    /// Selects `from`, then `to`, and finishes the turn if one was played.
    pub fn play(&mut self, from: Coord2, to: Coord2) -> Result<SelectOutcome> {
        self.finish_turn();

        if self.selected() != Some(from) {
            match self.select(from)? {
                SelectOutcome::Selected(_) => {}
                outcome => return Ok(outcome),
            }
        }

        let outcome = self.select(to)?;
        if outcome == SelectOutcome::Moved {
            self.finish_turn();
        }
        Ok(outcome)
    }

    fn start(&mut self) {
        let GameConfig {
            colors,
            min_run,
            queue_len,
            initial_tiles,
            ..
        } = self.config;

        self.board.clear();
        self.score = Saturating(0);
        self.last_turn = None;

        let opening: Vec<_> = (0..initial_tiles)
            .map(|_| self.generator.next_color(colors))
            .collect();
        let spawn = self.board.spawn_tiles(&opening, &mut self.generator);

        // a lucky opening is cleared without scoring
        let matches = self.board.check_matches_with(min_run);
        if !matches.is_empty() {
            log::debug!("clearing {} tiles matched by the opening", matches.len());
            self.board.resolve_matches(&matches);
        }

        self.upcoming = self.generator.next_queue(queue_len, colors);
        self.state = if spawn.board_full || self.board.is_full() {
            log::warn!("opening of {} tiles fills the board", initial_tiles);
            EngineState::GameOver
        } else {
            EngineState::Idle
        };
    }

    fn play_turn(&mut self, path: Path) -> TurnReport {
        let mut report = TurnReport::default();
        report.steps.push(TurnStep::Moved { path });

        // a move that completes a run skips spawning for the turn
        if !self.resolve_chain(&mut report) {
            let upcoming = core::mem::take(&mut self.upcoming);
            let spawn = self.board.spawn_tiles(&upcoming, &mut self.generator);
            report.board_full = spawn.board_full;
            report.steps.push(TurnStep::Spawned { tiles: spawn.placed });
            self.resolve_chain(&mut report);
        }

        report.board_full |= self.board.is_full();
        self.upcoming = self
            .generator
            .next_queue(self.config.queue_len, self.config.colors);
        report
    }

    /// Clears matches until none are left, returning whether any were found.
    fn resolve_chain(&mut self, report: &mut TurnReport) -> bool {
        let min_run = self.config.min_run;
        let mut matched = false;

        // every productive round clears at least one tile
        for _ in 0..=self.board.total_cells() {
            let matches = self.board.check_matches_with(min_run);
            if matches.is_empty() {
                return matched;
            }

            let cleared = self.board.resolve_matches(&matches);
            let points = points_for_clear(cleared, min_run);
            log::debug!("cleared {} tiles for {} points", cleared, points);
            self.score += points;
            report.points += points;
            report.steps.push(TurnStep::Cleared {
                positions: matches,
                points,
            });
            matched = true;
        }

        log::warn!("match chain did not settle, stopping");
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use TileColor::*;

    fn engine(
        rows: &[&str],
        upcoming: &[TileColor],
        picks: &[usize],
    ) -> PlayEngine<FixedTileGenerator> {
        let board = Board::from_rows(rows).unwrap();
        let config = GameConfig {
            size: board.size(),
            ..GameConfig::default()
        };
        let generator = FixedTileGenerator::new(&[], picks);
        PlayEngine::from_board(config, board, upcoming, generator).unwrap()
    }

    const STRIPES: [&str; 8] = [
        "ABCDEFAB", //
        "CDEFABCD",
        "EFABCDEF",
        "ABCDEFAB",
        "CDEFABCD",
        "EFABCDEF",
        "ABCDEFAB",
        "CDEFAB..",
    ];

    #[test]
    fn new_game_spawns_opening_and_queue() {
        let config = GameConfig::default();
        let engine = PlayEngine::with_seed(config, 1234);

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.board().occupied_count(), config.initial_tiles);
        assert_eq!(engine.upcoming().len(), usize::from(config.queue_len));
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn moving_into_a_run_of_five_scores_and_skips_spawn() {
        let mut engine = engine(
            &[
                "AAA.A...", //
                "........",
                "........",
                "...A....",
                "........",
                "........",
                "........",
                "........",
            ],
            &[Tulip, Daisy, Lily],
            &[],
        );

        let outcome = engine.play((3, 3), (0, 3)).unwrap();

        assert_eq!(outcome, SelectOutcome::Moved);
        assert_eq!(engine.score(), 50);
        assert!(engine.board().is_empty());
        let turn = engine.last_turn().unwrap();
        assert_eq!(turn.points, 50);
        assert_eq!(turn.cleared().count(), 5);
        assert_eq!(turn.spawned().count(), 0);
        assert_eq!(turn.path().map(Vec::len), Some(4));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.upcoming(), &[Rose, Rose, Rose]);
    }

    #[test]
    fn quiet_move_spawns_the_upcoming_queue() {
        let mut engine = engine(
            &[
                "A.......", //
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
            ],
            &[Tulip, Daisy, Lily],
            &[0, 0, 0],
        );

        engine.play((0, 0), (7, 7)).unwrap();

        let turn = engine.last_turn().unwrap();
        let spawned: Vec<_> = turn.spawned().collect();
        assert_eq!(spawned, [((0, 0), Tulip), ((0, 1), Daisy), ((0, 2), Lily)]);
        assert_eq!(engine.board().occupied_count(), 4);
        assert_eq!(engine.cell_at((7, 7)), Cell::Tile(Rose));
        assert_eq!(engine.score(), 0);
        assert!(!turn.matched());
    }

    #[test]
    fn spawn_completing_a_run_is_resolved() {
        let mut engine = engine(
            &[
                ".AAAA...", //
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
                ".......B",
            ],
            &[Rose, Daisy, Lily],
            &[0, 0, 0],
        );

        engine.play((7, 7), (7, 6)).unwrap();

        let turn = engine.last_turn().unwrap();
        assert!(matches!(turn.steps[1], TurnStep::Spawned { .. }));
        assert!(matches!(turn.steps[2], TurnStep::Cleared { points: 50, .. }));
        assert_eq!(turn.steps.len(), 3);
        assert_eq!(engine.score(), 50);
        assert_eq!(engine.cell_at((0, 0)), Cell::Empty);
        assert_eq!(engine.cell_at((0, 5)), Cell::Tile(Daisy));
        assert_eq!(engine.cell_at((0, 6)), Cell::Tile(Lily));
        assert_eq!(engine.board().occupied_count(), 3);
    }

    #[test]
    fn selection_toggles_and_switches() {
        let mut engine = engine(&["AB..", "....", "....", "...."], &[], &[]);

        assert_eq!(engine.select((2, 2)).unwrap(), SelectOutcome::NoChange);
        assert_eq!(engine.select((0, 0)).unwrap(), SelectOutcome::Selected((0, 0)));
        assert_eq!(engine.select((0, 1)).unwrap(), SelectOutcome::Selected((0, 1)));
        assert_eq!(engine.selected(), Some((0, 1)));
        assert_eq!(engine.select((0, 1)).unwrap(), SelectOutcome::Deselected);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn unreachable_destination_is_rejected_silently() {
        let mut engine = engine(&["AB..", "B...", "....", "...."], &[], &[]);
        let before = engine.board().clone();

        engine.select((0, 0)).unwrap();
        let outcome = engine.select((3, 3)).unwrap();

        assert_eq!(outcome, SelectOutcome::Rejected);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.board(), &before);
        assert!(engine.last_turn().is_none());
    }

    #[test]
    fn input_is_ignored_while_processing() {
        let mut engine = engine(&["A...", "....", "....", "...."], &[Tulip], &[]);

        engine.select((0, 0)).unwrap();
        assert_eq!(engine.select((3, 3)).unwrap(), SelectOutcome::Moved);
        assert_eq!(engine.state(), EngineState::Processing);
        assert!(!engine.can_select((3, 3)));
        assert_eq!(engine.select((3, 3)).unwrap(), SelectOutcome::Ignored);

        assert_eq!(engine.finish_turn(), EngineState::Idle);
        assert!(engine.can_select((3, 3)));
    }

    #[test]
    fn short_spawn_ends_the_game() {
        let mut engine = engine(&STRIPES, &[Rose, Rose, Rose], &[]);

        let outcome = engine.play((7, 5), (7, 7)).unwrap();

        assert_eq!(outcome, SelectOutcome::Moved);
        let turn = engine.last_turn().unwrap();
        assert!(turn.board_full);
        assert_eq!(turn.spawned().count(), 2);
        assert!(engine.board().is_full());
        assert_eq!(engine.state(), EngineState::GameOver);
        assert_eq!(engine.select((0, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn reset_leaves_game_over() {
        let mut engine = engine(&STRIPES, &[Rose, Rose, Rose], &[]);
        engine.play((7, 5), (7, 7)).unwrap();
        assert!(engine.is_finished());

        engine.reset();

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.size(), (8, 8));
        assert_eq!(engine.board().occupied_count(), 3);
        assert!(engine.last_turn().is_none());
    }

    #[test]
    fn out_of_bounds_selection_is_an_error() {
        let mut engine = engine(&STRIPES, &[], &[]);

        assert_eq!(engine.select((8, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn mismatched_board_size_is_rejected() {
        let board = Board::new((4, 4));
        let result = PlayEngine::from_board(
            GameConfig::default(),
            board,
            &[],
            FixedTileGenerator::default(),
        );

        assert!(matches!(result, Err(GameError::InvalidBoardShape)));
    }

    #[test]
    fn seeded_games_never_lose_tiles() {
        let mut engine = PlayEngine::with_seed(GameConfig::default(), 99);

        for _ in 0..200 {
            if engine.is_finished() {
                break;
            }
            let tiles: Vec<_> = engine.board().iter_tiles().map(|(coords, _)| coords).collect();
            let free = engine.board().empty_cells();
            let before = engine.board().occupied_count();
            let Some((from, to)) = tiles.iter().find_map(|&from| {
                free.iter()
                    .find(|&&to| engine.board().find_path(from, to).is_some())
                    .map(|&to| (from, to))
            }) else {
                break;
            };

            assert_eq!(engine.play(from, to).unwrap(), SelectOutcome::Moved);
            let turn = engine.last_turn().unwrap();
            let spawned = turn.spawned().count() as CellCount;
            let cleared = turn.cleared().count() as CellCount;
            assert_eq!(engine.board().occupied_count(), before + spawned - cleared);
            assert!(engine.board().check_matches().is_empty());
        }
    }
}
