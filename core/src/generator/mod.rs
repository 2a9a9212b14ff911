use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, mode: Mode) -> Board;
}

/// Cells that must stay free of mines around the first opened cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SafeZone {
    /// Only the opened cell itself.
    Cell,
    /// The opened cell and all of its in-bounds neighbours, so the first open is always a zero.
    Neighborhood,
}
