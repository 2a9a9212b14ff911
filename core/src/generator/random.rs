use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::Xoshiro256PlusPlus;
use smallvec::{SmallVec, smallvec};

use super::*;

/// Uniformly random placement that keeps a [`SafeZone`] around the start cell free of mines. A
/// fixed seed always reproduces the same board, on every platform.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
    start: Coord2,
    safe_zone: SafeZone,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64, start: Coord2, safe_zone: SafeZone) -> Self {
        Self {
            seed,
            start,
            safe_zone,
        }
    }

    /// Flat indices that may not hold a mine, falling back to the start cell alone when the
    /// neighbourhood leaves too few cells for the requested mines.
    fn exclusion_set(&self, mode: Mode) -> SmallVec<[usize; 9]> {
        let mut excluded: SmallVec<[usize; 9]> = smallvec![mode.index_of(self.start)];

        match self.safe_zone {
            SafeZone::Cell => {}
            SafeZone::Neighborhood => {
                let zone: SmallVec<[usize; 8]> = mode
                    .neighbors(self.start)
                    .map(|pos| mode.index_of(pos))
                    .collect();
                let free = usize::from(mode.total_cells()).saturating_sub(1 + zone.len());
                if usize::from(mode.mines()) > free {
                    log::warn!(
                        "Cannot keep neighbours of {:?} free on {mode}, only the start stays safe",
                        self.start
                    );
                } else {
                    excluded.extend(zone);
                }
            }
        }

        excluded
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, mode: Mode) -> Board {
        let excluded = self.exclusion_set(mode);
        let candidates: Vec<usize> = (0..usize::from(mode.total_cells()))
            .filter(|index| !excluded.contains(index))
            .collect();

        let width = usize::from(mode.width());
        let mut mine_mask: Array2<bool> = Array2::default(mode.shape().to_nd_index());
        // stable output stream: seeded boards are pinned by tests
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        // without replacement, so this always terminates even at maximum density
        for pick in rand::seq::index::sample(&mut rng, candidates.len(), mode.mines().into()) {
            let index = candidates[pick];
            mine_mask[[index / width, index % width]] = true;
        }

        log::debug!(
            "Generated {mode} board from seed {} with start {:?}",
            self.seed,
            self.start
        );
        Board::from_mine_mask(mode, &mine_mask)
    }
}
