use core::fmt;

use serde::{Deserialize, Serialize};

/// Player-visible (and ground-truth) state of a single cell.
///
/// A [`Board`](crate::Board) only ever holds [`Mine`](Self::Mine) and [`Open`](Self::Open);
/// the revealed field additionally starts out [`Closed`](Self::Closed).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Closed,
    Mine,
    /// Revealed safe cell with the number of adjacent mines, `0..=8`.
    Open(u8),
}

impl CellState {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Open(0))
    }

    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Open(count) => Some(count),
            _ => None,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Closed
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("#"),
            Self::Mine => f.write_str("*"),
            Self::Open(0) => f.write_str("."),
            Self::Open(count) => write!(f, "{count}"),
        }
    }
}
