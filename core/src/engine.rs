use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    GameOver,
    Win,
}

impl GameState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Win)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Derives the outcome from what the player can see. A revealed mine always wins over the
/// closed-cell count.
pub fn classify(field: ArrayView2<'_, CellState>, mode: Mode) -> GameState {
    let mut closed = 0usize;
    for &cell in field.iter() {
        match cell {
            CellState::Mine => return GameState::GameOver,
            CellState::Closed => closed += 1,
            CellState::Open(_) => {}
        }
    }

    if closed == usize::from(mode.mines()) {
        GameState::Win
    } else {
        GameState::InProgress
    }
}

/// A single game: the mode, the lazily generated board, and the field the player sees.
///
/// The board does not exist until the first [`open`](Self::open), which picks it so that the
/// opened cell and its neighbours are free of mines.
///
/// Snapshots only load when the field fits the mode, every revealed cell agrees with the board,
/// and the cached state is the one the field implies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineFields")]
pub struct GameEngine {
    mode: Mode,
    seed: Option<u64>,
    board: Option<Board>,
    field: Array2<CellState>,
    state: GameState,
}

#[derive(Deserialize)]
struct EngineFields {
    mode: Mode,
    seed: Option<u64>,
    board: Option<Board>,
    field: Array2<CellState>,
    state: GameState,
}

impl TryFrom<EngineFields> for GameEngine {
    type Error = GameError;

    fn try_from(fields: EngineFields) -> Result<Self> {
        let EngineFields {
            mode,
            seed,
            board,
            field,
            state,
        } = fields;

        if field.shape() != &mode.shape().to_nd_index() {
            return Err(GameError::InvalidBoardShape);
        }

        let revealed_match = match &board {
            Some(board) => {
                board.mode() == mode
                    && field
                        .iter()
                        .zip(board.cells().iter())
                        .all(|(seen, truth)| seen.is_closed() || seen == truth)
            }
            None => field.iter().all(|cell| cell.is_closed()),
        };
        if !revealed_match || state != classify(field.view(), mode) {
            return Err(GameError::InconsistentSnapshot);
        }

        Ok(Self {
            mode,
            seed,
            board,
            field,
            state,
        })
    }
}

impl GameEngine {
    /// Engine whose board will come from a fresh random seed.
    pub fn new(mode: Mode) -> Self {
        Self::with_optional_seed(mode, None)
    }

    pub fn with_seed(mode: Mode, seed: u64) -> Self {
        Self::with_optional_seed(mode, Some(seed))
    }

    pub fn with_optional_seed(mode: Mode, seed: Option<u64>) -> Self {
        Self {
            mode,
            seed,
            board: None,
            field: Array2::default(mode.shape().to_nd_index()),
            state: GameState::default(),
        }
    }

    /// Engine playing a fixed layout. The first open gets no safety guarantee.
    pub fn from_board(board: Board) -> Self {
        let mode = board.mode();
        Self {
            mode,
            seed: None,
            board: Some(board),
            field: Array2::default(mode.shape().to_nd_index()),
            state: GameState::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Seed the board was (or will be) generated from. Unseeded engines report one after the
    /// first open, so the game can be replayed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Ground truth, available once the first cell has been opened.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn field(&self) -> ArrayView2<'_, CellState> {
        self.field.view()
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.field[coords.to_nd_index()]
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn closed_count(&self) -> usize {
        self.field.iter().filter(|cell| cell.is_closed()).count()
    }

    /// Opens the cell at flat row-major `index` and returns the resulting state.
    ///
    /// Out-of-range indices fail without touching the game. Once the game is over every open is
    /// ignored and the final state is returned again.
    pub fn open(&mut self, index: usize) -> Result<GameState> {
        let start = self.mode.coords_of(index)?;

        if self.state.is_terminal() {
            log::debug!("Ignoring open of {index}, game already ended with {:?}", self.state);
            return Ok(self.state);
        }

        let mode = self.mode;
        let seed = &mut self.seed;
        let board = self.board.get_or_insert_with(|| {
            let seed = *seed.get_or_insert_with(rand::random);
            RandomBoardGenerator::new(seed, start, SafeZone::Neighborhood).generate(mode)
        });

        let revealed = reveal_cascade(board, &mut self.field, start);
        log::trace!("Opened {index} revealing {revealed} cells");

        self.state = classify(self.field.view(), mode);
        if self.state.is_terminal() {
            log::debug!("Game on {mode} ended with {:?}", self.state);
        }
        Ok(self.state)
    }
}

/// Breadth-first reveal from `start`: every zero cell reached also reveals all of its closed
/// neighbours. Returns the number of newly revealed cells.
fn reveal_cascade(board: &Board, field: &mut Array2<CellState>, start: Coord2) -> usize {
    let start_cell = &mut field[start.to_nd_index()];
    if !start_cell.is_closed() {
        return 0;
    }
    *start_cell = board[start];

    let mut revealed = 1;
    let mut to_visit = VecDeque::from([start]);

    while let Some(coords) = to_visit.pop_front() {
        if !field[coords.to_nd_index()].is_zero() {
            continue;
        }

        for pos in board.mode().neighbors(coords) {
            let cell = &mut field[pos.to_nd_index()];
            if cell.is_closed() {
                *cell = board[pos];
                revealed += 1;
                to_visit.push_back(pos);
            }
        }
    }

    revealed
}
