use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Observation and move contract shared by the simulated engine and anything else that can be
/// played cell by cell, such as a front end driving a real game window.
pub trait Playable {
    fn mode(&self) -> Mode;

    fn field(&self) -> ArrayView2<'_, CellState>;

    fn state(&self) -> GameState;

    fn open(&mut self, index: usize) -> Result<GameState>;
}

impl Playable for GameEngine {
    fn mode(&self) -> Mode {
        GameEngine::mode(self)
    }

    fn field(&self) -> ArrayView2<'_, CellState> {
        GameEngine::field(self)
    }

    fn state(&self) -> GameState {
        GameEngine::state(self)
    }

    fn open(&mut self, index: usize) -> Result<GameState> {
        GameEngine::open(self, index)
    }
}

/// Picks the next cell to open from the visible field, or `None` to give up.
pub trait Policy {
    fn next_index(&mut self, mode: Mode, field: ArrayView2<'_, CellState>) -> Option<usize>;
}

impl<F> Policy for F
where
    F: FnMut(Mode, ArrayView2<'_, CellState>) -> Option<usize>,
{
    fn next_index(&mut self, mode: Mode, field: ArrayView2<'_, CellState>) -> Option<usize> {
        self(mode, field)
    }
}

/// Opens `first`, then keeps opening whatever `policy` asks for until the game ends or the
/// policy returns `None`.
pub fn play<G, P>(game: &mut G, first: usize, policy: &mut P) -> Result<GameState>
where
    G: Playable + ?Sized,
    P: Policy + ?Sized,
{
    let mut state = game.open(first)?;
    while !state.is_terminal() {
        let Some(index) = policy.next_index(game.mode(), game.field()) else {
            break;
        };
        state = game.open(index)?;
    }
    Ok(state)
}

/// Running totals over many simulated games.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub games_played: u64,
    pub games_won: u64,
    pub cells_revealed: u64,
}

impl Session {
    pub fn record(&mut self, state: GameState, field: ArrayView2<'_, CellState>) {
        self.games_played += 1;
        if state == GameState::Win {
            self.games_won += 1;
        }
        self.cells_revealed += field.iter().filter(|cell| !cell.is_closed()).count() as u64;
    }

    /// Plays one fresh game of `mode` from its centre cell and records the result.
    pub fn play_one<P>(
        &mut self,
        mode: Mode,
        seed: Option<u64>,
        policy: &mut P,
    ) -> Result<GameState>
    where
        P: Policy + ?Sized,
    {
        let mut engine = GameEngine::with_optional_seed(mode, seed);
        let state = play(&mut engine, mode.center_index(), policy)?;
        self.record(state, engine.field());
        log::debug!("Game {} on {mode} finished with {state:?}", self.games_played);
        Ok(state)
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }
}
