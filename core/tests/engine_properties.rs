use ndarray::Array2;
use sapper_core::*;

const SEEDS: [u64; 6] = [0, 1, 7, 42, 1234, 0xdead_beef];

fn all_modes() -> Vec<Mode> {
    let mut modes: Vec<Mode> = Mode::PRESETS.iter().map(|&(_, mode)| mode).collect();
    modes.push(Mode::new(5, 3, 2).unwrap());
    modes.push(Mode::new(1, 12, 3).unwrap());
    modes.push(Mode::new(4, 4, 12).unwrap());
    modes
}

fn brute_force_count(board: &Board, coords: Coord2) -> u8 {
    board
        .mode()
        .neighbors(coords)
        .filter(|&pos| board.is_mine(pos))
        .count() as u8
}

fn safe_indices(engine: &GameEngine) -> Vec<usize> {
    engine
        .board()
        .unwrap()
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_mine())
        .map(|(index, _)| index)
        .collect()
}

/// Every revealed zero must have no closed neighbour left behind.
fn assert_cascade_complete(engine: &GameEngine) {
    let mode = engine.mode();
    for (index, cell) in engine.field().iter().enumerate() {
        if !cell.is_zero() {
            continue;
        }
        let coords = mode.coords_of(index).unwrap();
        for pos in mode.neighbors(coords) {
            assert!(
                !engine.cell_at(pos).is_closed(),
                "zero at {coords:?} left {pos:?} closed"
            );
        }
    }
}

/// Every revealed cell must match the ground truth.
fn assert_field_matches_board(engine: &GameEngine) {
    let board = engine.board().unwrap();
    for (field_cell, board_cell) in engine.field().iter().zip(board.cells().iter()) {
        if !field_cell.is_closed() {
            assert_eq!(field_cell, board_cell);
        }
    }
}

#[test]
fn fresh_engines_are_closed_and_in_progress() {
    for mode in all_modes() {
        let engine = GameEngine::new(mode);
        assert_eq!(engine.state(), GameState::InProgress);
        assert_eq!(engine.closed_count(), usize::from(mode.total_cells()));
        assert_eq!(
            engine.field().dim(),
            (usize::from(mode.height()), usize::from(mode.width()))
        );
    }
}

#[test]
fn same_seed_and_moves_give_identical_fields() {
    for mode in all_modes() {
        for seed in SEEDS {
            let mut a = GameEngine::with_seed(mode, seed);
            let mut b = GameEngine::with_seed(mode, seed);
            let cells = usize::from(mode.total_cells());

            for step in 0..cells {
                let index = (step * 7 + 3) % cells;
                assert_eq!(a.open(index), b.open(index));
                assert_eq!(a.field(), b.field());
            }
        }
    }
}

#[test]
fn boards_hold_exact_mines_and_counts() {
    for mode in all_modes() {
        for seed in SEEDS {
            let mut engine = GameEngine::with_seed(mode, seed);
            engine.open(mode.center_index()).unwrap();
            let board = engine.board().unwrap();

            assert_eq!(board.mine_indices().count(), usize::from(mode.mines()));
            for (index, &cell) in board.cells().iter().enumerate() {
                let coords = mode.coords_of(index).unwrap();
                match cell {
                    CellState::Mine => {}
                    CellState::Open(count) => assert_eq!(count, brute_force_count(board, coords)),
                    CellState::Closed => panic!("board cell {coords:?} is closed"),
                }
            }
        }
    }
}

#[test]
fn first_open_is_always_safe() {
    for mode in all_modes() {
        for seed in SEEDS {
            for index in [0, mode.center_index(), usize::from(mode.total_cells()) - 1] {
                let mut engine = GameEngine::with_seed(mode, seed);
                let state = engine.open(index).unwrap();
                let start = mode.coords_of(index).unwrap();
                let board = engine.board().unwrap();

                assert_ne!(state, GameState::GameOver);
                assert!(!board.is_mine(start));

                let neighbors = mode.neighbors(start).count();
                let zone_fits =
                    usize::from(mode.mines()) < usize::from(mode.total_cells()) - neighbors;
                if zone_fits {
                    for pos in mode.neighbors(start) {
                        assert!(!board.is_mine(pos), "{mode} seed {seed}: mine next to {start:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn cascades_leave_no_orphaned_zero_border() {
    for mode in all_modes() {
        for seed in SEEDS {
            let mut engine = GameEngine::with_seed(mode, seed);
            engine.open(mode.center_index()).unwrap();
            assert_cascade_complete(&engine);
            assert_field_matches_board(&engine);

            for index in safe_indices(&engine).into_iter().step_by(5) {
                engine.open(index).unwrap();
                assert_cascade_complete(&engine);
                assert_field_matches_board(&engine);
            }
        }
    }
}

#[test]
fn terminal_states_freeze_the_game() {
    for seed in SEEDS {
        let mode = Mode::EASY;
        let mut engine = GameEngine::with_seed(mode, seed);
        engine.open(mode.center_index()).unwrap();
        if engine.is_finished() {
            continue;
        }

        let mine = engine.board().unwrap().mine_indices().next().unwrap();
        assert_eq!(engine.open(mine), Ok(GameState::GameOver));

        let frozen: Array2<CellState> = engine.field().to_owned();
        for index in 0..usize::from(mode.total_cells()) {
            assert_eq!(engine.open(index), Ok(GameState::GameOver));
            assert_eq!(engine.field(), frozen);
        }
    }
}

#[test]
fn out_of_range_open_is_rejected_without_side_effects() {
    let mode = Mode::MEDIUM;
    let mut engine = GameEngine::with_seed(mode, 99);
    engine.open(mode.center_index()).unwrap();
    let before = engine.clone();

    for index in [256, 257, usize::MAX] {
        assert_eq!(
            engine.open(index),
            Err(GameError::IndexOutOfRange { index, cells: 256 })
        );
        assert_eq!(engine, before);
    }
}

#[test]
fn opening_a_mine_after_first_click_only_reveals_that_mine() {
    let mode = Mode::CLASSIC;
    for seed in SEEDS {
        let mut engine = GameEngine::with_seed(mode, seed);
        assert_eq!(engine.open(0), Ok(GameState::InProgress));
        let before = engine.field().to_owned();

        let mine = engine.board().unwrap().mine_indices().last().unwrap();
        let mine_coords = mode.coords_of(mine).unwrap();
        assert_eq!(engine.open(mine), Ok(GameState::GameOver));

        let mut expected = before;
        expected[mine_coords.to_nd_index()] = CellState::Mine;
        assert_eq!(engine.field(), expected);
    }
}

#[test]
fn opening_every_safe_cell_wins_in_any_order() {
    for mode in all_modes() {
        for seed in SEEDS {
            let mut engine = GameEngine::with_seed(mode, seed);
            engine.open(mode.center_index()).unwrap();

            let mut safe = safe_indices(&engine);
            safe.reverse();
            let last = safe.len() - 1;
            for (n, index) in safe.into_iter().enumerate() {
                let state = engine.open(index).unwrap();
                if n < last {
                    assert_ne!(state, GameState::GameOver);
                } else {
                    assert_eq!(state, GameState::Win);
                }
            }

            assert_eq!(engine.closed_count(), usize::from(mode.mines()));
            let board = engine.board().unwrap().clone();
            for mine in board.mine_indices() {
                assert_eq!(engine.open(mine), Ok(GameState::Win));
            }
            assert_eq!(engine.closed_count(), usize::from(mode.mines()));
        }
    }
}
