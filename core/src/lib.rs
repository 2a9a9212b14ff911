//! Deterministic Minesweeper simulation: lazily generated boards that keep the first click
//! safe, breadth-first cascades over zero cells, and a cached game outcome after every move.

use core::fmt;
use core::ops::Index;
use core::str::FromStr;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use interface::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod interface;
mod tile;
mod types;

/// Grid dimensions and mine count of a game.
///
/// Always satisfies `width > 0`, `height > 0` and `mines < width * height`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ModeFields", into = "ModeFields")]
pub struct Mode {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

#[derive(Copy, Clone, Serialize, Deserialize)]
struct ModeFields {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl TryFrom<ModeFields> for Mode {
    type Error = GameError;

    fn try_from(fields: ModeFields) -> Result<Self> {
        Self::new(fields.width, fields.height, fields.mines)
    }
}

impl From<Mode> for ModeFields {
    fn from(mode: Mode) -> Self {
        Self {
            width: mode.width,
            height: mode.height,
            mines: mode.mines,
        }
    }
}

impl Mode {
    pub const CLASSIC: Self = Self::new_unchecked(8, 8, 9);
    pub const EASY: Self = Self::new_unchecked(9, 9, 10);
    pub const MEDIUM: Self = Self::new_unchecked(16, 16, 40);
    pub const EXPERT: Self = Self::new_unchecked(30, 16, 99);

    pub const PRESETS: [(&'static str, Self); 4] = [
        ("classic", Self::CLASSIC),
        ("easy", Self::EASY),
        ("medium", Self::MEDIUM),
        ("expert", Self::EXPERT),
    ];

    const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let cells = CellCount::from(width) * CellCount::from(height);
        if width == 0 || height == 0 || mines >= cells {
            return Err(GameError::InvalidMode {
                width,
                height,
                mines,
            });
        }
        Ok(Self::new_unchecked(width, height, mines))
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    /// `(height, width)`, the shape of every grid of this mode.
    pub const fn shape(&self) -> Coord2 {
        (self.height, self.width)
    }

    /// At most `255 * 255`, which always fits a `CellCount`.
    pub const fn total_cells(&self) -> CellCount {
        self.width as CellCount * self.height as CellCount
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    /// Row-major coordinates of a flat cell index.
    pub fn coords_of(&self, index: usize) -> Result<Coord2> {
        let cells = self.total_cells();
        if index >= usize::from(cells) {
            return Err(GameError::IndexOutOfRange { index, cells });
        }
        let width = usize::from(self.width);
        // both fit: index < width * height and each dimension is a `Coord`
        Ok(((index / width) as Coord, (index % width) as Coord))
    }

    pub fn index_of(&self, (row, col): Coord2) -> usize {
        usize::from(row) * usize::from(self.width) + usize::from(col)
    }

    /// In-bounds cells touching `center`, row by row. Edges are never wrapped, so a cell in the
    /// last column has no neighbours in the first one.
    pub fn neighbors(&self, center: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        let (row, col) = center;
        let rows = row.saturating_sub(1)..=row.saturating_add(1).min(self.height - 1);
        let cols = col.saturating_sub(1)..=col.saturating_add(1).min(self.width - 1);
        rows.flat_map(move |r| cols.clone().map(move |c| (r, c)))
            .filter(move |&pos| pos != center)
    }

    /// The middle cell, the conventional first click for automated play.
    pub fn center_index(&self) -> usize {
        self.index_of((self.height / 2, self.width / 2))
    }

    pub fn preset_name(&self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, preset)| preset == self)
            .map(|&(name, _)| name)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preset_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}x{}x{}", self.width, self.height, self.mines),
        }
    }
}

impl FromStr for Mode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(&(_, preset)) = Self::PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            return Ok(preset);
        }

        let mut parts = s.split(['x', 'X']).map(str::trim);
        let mut next = || parts.next().ok_or(GameError::MalformedMode);
        let width = next()?.parse().map_err(|_| GameError::MalformedMode)?;
        let height = next()?.parse().map_err(|_| GameError::MalformedMode)?;
        let mines = next()?.parse().map_err(|_| GameError::MalformedMode)?;
        if parts.next().is_some() {
            return Err(GameError::MalformedMode);
        }
        Self::new(width, height, mines)
    }
}

/// Hidden ground truth of a game: every cell is either a mine or the count of its adjacent mines.
///
/// Deserialization recounts the grid, so a loaded board always agrees with its mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardFields")]
pub struct Board {
    mode: Mode,
    cells: Array2<CellState>,
}

#[derive(Deserialize)]
struct BoardFields {
    mode: Mode,
    cells: Array2<CellState>,
}

impl TryFrom<BoardFields> for Board {
    type Error = GameError;

    fn try_from(BoardFields { mode, cells }: BoardFields) -> Result<Self> {
        if cells.shape() != &mode.shape().to_nd_index() {
            return Err(GameError::InvalidBoardShape);
        }

        let board = Self::from_mine_mask(mode, &cells.map(|cell| cell.is_mine()));
        if board.cells != cells || board.mine_indices().count() != usize::from(mode.mines()) {
            return Err(GameError::InconsistentSnapshot);
        }
        Ok(board)
    }
}

impl Board {
    /// Counts neighbours for every safe cell of `mine_mask`, whose shape must match `mode`.
    pub(crate) fn from_mine_mask(mode: Mode, mine_mask: &Array2<bool>) -> Self {
        let cells = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[(row, col)] {
                return CellState::Mine;
            }
            // in bounds of the mask, so both fit into `Coord`
            let coords = (row as Coord, col as Coord);
            let count = mode
                .neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            CellState::Open(count as u8)
        });
        Self { mode, cells }
    }

    /// Builds a fixed layout from flat mine indices. Duplicates are counted once; the mode's mine
    /// count is taken from the distinct indices.
    pub fn from_mine_indices(width: Coord, height: Coord, mine_indices: &[usize]) -> Result<Self> {
        let bounds = Mode::new_unchecked(width, height, 0);
        let mut mine_mask: Array2<bool> = Array2::default(bounds.shape().to_nd_index());

        for &index in mine_indices {
            let coords = bounds.coords_of(index)?;
            mine_mask[coords.to_nd_index()] = true;
        }

        // bounded by `total_cells`
        let mines = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        let mode = Mode::new(width, height, mines)?;
        Ok(Self::from_mine_mask(mode, &mine_mask))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cells(&self) -> ArrayView2<'_, CellState> {
        self.cells.view()
    }

    pub fn is_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mode.mines()
    }

    pub fn mine_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(index, _)| index)
    }
}

impl Index<Coord2> for Board {
    type Output = CellState;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
