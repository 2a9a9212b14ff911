use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid mode {width}x{height} with {mines} mines")]
    InvalidMode {
        width: Coord,
        height: Coord,
        mines: CellCount,
    },
    #[error("Cell index {index} is out of range for {cells} cells")]
    IndexOutOfRange { index: usize, cells: CellCount },
    #[error("Malformed mode, expected a preset name or WIDTHxHEIGHTxMINES")]
    MalformedMode,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Snapshot contents do not agree with its mode and board")]
    InconsistentSnapshot,
}

pub type Result<T> = core::result::Result<T, GameError>;
