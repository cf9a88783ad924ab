#[cfg(test)]
mod tests {
    use crate::components::{BlockKind, Board, Cell, FallingPair};
    use crate::game::{GRID_COLS, GRID_ROWS};
    use crate::rng::LcgRng;
    use crate::tests::test_utils::place;

    fn pair_at(x: i32, y: i32, rotation: u8) -> FallingPair {
        FallingPair {
            cells: [BlockKind::GreenJelly, BlockKind::RedJelly],
            x,
            y,
            rotation,
        }
    }

    #[test]
    fn test_pair_positions_cycle_clockwise() {
        // Partner orbits the pivot: right, below, left, above
        let expected = [(4, 5), (3, 6), (2, 5), (3, 4)];
        for (rotation, &(px, py)) in expected.iter().enumerate() {
            let positions = pair_at(3, 5, rotation as u8).positions();
            assert_eq!((positions[0].x, positions[0].y), (3, 5));
            assert_eq!(positions[0].index, 0);
            assert_eq!((positions[1].x, positions[1].y), (px, py));
            assert_eq!(positions[1].index, 1);
        }
    }

    #[test]
    fn test_spawn_position() {
        let pair = FallingPair::spawn([BlockKind::Star, BlockKind::Bomb]);
        let positions = pair.positions();

        assert_eq!((positions[0].x, positions[0].y), (2, 0));
        assert_eq!((positions[1].x, positions[1].y), (3, 0));
        assert_eq!(pair.rotation, 0);
    }

    #[test]
    fn test_can_place_requires_empty_in_bounds() {
        let mut board = Board::default();
        let pair = pair_at(0, 0, 0);
        assert!(board.can_place(&pair.positions()));

        // Out of bounds on the left
        assert!(!board.can_place(&pair_at(-1, 0, 0).positions()));
        // Out of bounds below
        assert!(!board.can_place(&pair_at(0, GRID_ROWS as i32 - 1, 1).positions()));

        // Occupied cell
        place(&mut board, 1, 0, BlockKind::Brick);
        assert!(!board.can_place(&pair.positions()));
    }

    #[test]
    fn test_try_move_rejects_silently() {
        let board = Board::default();
        let pair = pair_at(0, 5, 0);

        // Legal move goes through
        let moved = board.try_move(&pair, 1, 0);
        assert_eq!(moved.x, 1);

        // Illegal move returns the pair unchanged, no error
        let stuck = board.try_move(&pair, -1, 0);
        assert_eq!(stuck, pair);
    }

    #[test]
    fn test_try_rotate_single_candidate() {
        let mut board = Board::default();
        let pair = pair_at(0, 5, 0);

        let rotated = board.try_rotate(&pair);
        assert_eq!(rotated.rotation, 1);

        // Occupy the single candidate cell below the pivot; there is no
        // wall-kick search, so the rotation is rejected outright
        place(&mut board, 0, 6, BlockKind::Brick);
        let stuck = board.try_rotate(&pair);
        assert_eq!(stuck, pair);
    }

    #[test]
    fn test_rotation_wraps_around() {
        let board = Board::default();
        let mut pair = pair_at(4, 5, 0);

        for _ in 0..4 {
            pair = board.try_rotate(&pair);
        }
        assert_eq!(pair.rotation, 0);
    }

    #[test]
    fn test_ghost_positions_project_to_floor() {
        let mut board = Board::default();
        let pair = pair_at(2, 0, 0);

        let ghost = board.ghost_positions(&pair);
        assert_eq!((ghost[0].x, ghost[0].y), (2, GRID_ROWS as i32 - 1));
        assert_eq!((ghost[1].x, ghost[1].y), (3, GRID_ROWS as i32 - 1));

        // Ghost projection never mutates the board
        assert_eq!(board, Board::default());

        // A stack under one half stops the whole pair
        place(&mut board, 3, 8, BlockKind::Star);
        let ghost = board.ghost_positions(&pair);
        assert_eq!((ghost[0].x, ghost[0].y), (2, 7));
        assert_eq!((ghost[1].x, ghost[1].y), (3, 7));
    }

    #[test]
    fn test_lock_pair_writes_indexed_cells() {
        let mut board = Board::default();
        let pair = pair_at(3, 5, 2); // partner to the left, so cells[1] at (2, 5)
        board.lock_pair(&pair);

        assert_eq!(board.cells[3][5], Some(Cell::new(BlockKind::GreenJelly)));
        assert_eq!(board.cells[2][5], Some(Cell::new(BlockKind::RedJelly)));
    }

    #[test]
    fn test_gravity_step_moves_one_row() {
        let mut board = Board::default();
        place(&mut board, 3, 5, BlockKind::Star);

        let step = board.gravity_step();
        assert!(step.moved);
        assert_eq!(step.falls.len(), 1);
        assert_eq!(
            (step.falls[0].x, step.falls[0].from_y, step.falls[0].to_y),
            (3, 5, 6)
        );
        assert!(board.cells[3][5].is_none());
        assert!(board.cells[3][6].is_some());
    }

    #[test]
    fn test_gravity_step_shifts_stacks_as_a_unit() {
        let mut board = Board::default();
        place(&mut board, 2, 4, BlockKind::GreenJelly);
        place(&mut board, 2, 5, BlockKind::RedJelly);

        let step = board.gravity_step();
        assert!(step.moved);
        assert_eq!(step.falls.len(), 2);
        assert_eq!(board.cells[2][5], Some(Cell::new(BlockKind::GreenJelly)));
        assert_eq!(board.cells[2][6], Some(Cell::new(BlockKind::RedJelly)));
    }

    #[test]
    fn test_gravity_step_idempotent_once_settled() {
        let mut board = Board::default();
        place(&mut board, 0, 2, BlockKind::GreenJelly);
        place(&mut board, 5, 7, BlockKind::Brick);

        let mut guard = 0;
        while board.gravity_step().moved {
            guard += 1;
            assert!(guard <= GRID_ROWS, "gravity never settled");
        }

        let settled = board.clone();
        let step = board.gravity_step();
        assert!(!step.moved);
        assert!(step.falls.is_empty());
        assert_eq!(board, settled);
    }

    #[test]
    fn test_column_fill_counts_contiguous_run() {
        let mut board = Board::default();
        place(&mut board, 4, GRID_ROWS - 1, BlockKind::Star);
        place(&mut board, 4, GRID_ROWS - 2, BlockKind::Star);
        // A floating cell above a gap does not count
        place(&mut board, 4, GRID_ROWS - 4, BlockKind::Star);

        assert_eq!(board.column_fill(4), 2);
        assert_eq!(board.column_fill(0), 0);
    }

    #[test]
    fn test_overlay_pair_is_display_only() {
        let board = Board::default();
        let pair = pair_at(3, 5, 0);

        let overlay = board.overlay_pair(Some(&pair));
        assert_eq!(overlay[3][5], Some(Cell::new(BlockKind::GreenJelly)));
        assert_eq!(overlay[4][5], Some(Cell::new(BlockKind::RedJelly)));
        assert!(board.cells[3][5].is_none());

        let plain = board.overlay_pair(None);
        assert_eq!(plain, board.cells);
    }

    #[test]
    fn test_draw_jelly_only_returns_jellies() {
        let mut rng = LcgRng::new(11);
        for _ in 0..200 {
            assert!(BlockKind::draw_jelly(&mut rng).is_jelly());
        }
    }

    #[test]
    fn test_board_dimensions() {
        assert_eq!(GRID_COLS, 8);
        assert_eq!(GRID_ROWS, 12);
    }
}
