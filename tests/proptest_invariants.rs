//! Property tests for the bag queue and line clearing.

use proptest::prelude::*;

use tetris_wall::core::{Board, ColorBuffer, PieceQueue};
use tetris_wall::types::PieceKind;

proptest! {
    #[test]
    fn every_seven_draws_is_a_permutation(seed in any::<u32>(), bags in 1usize..6) {
        let mut queue = PieceQueue::new(seed);
        for _ in 0..bags {
            let mut drawn: Vec<PieceKind> = (0..7).map(|_| queue.draw()).collect();
            drawn.sort();
            prop_assert_eq!(drawn, PieceKind::ALL.to_vec());
        }
    }

    #[test]
    fn clearing_keeps_height_and_removes_full_rows(
        rows in proptest::collection::vec(prop_oneof![Just(0xFFu16), 0u16..=0xFF], 8)
    ) {
        let width = 8u16;
        let full = (1u128 << width) - 1;
        let mut board = Board::new(width, 8);
        for (y, mask) in rows.iter().enumerate() {
            board.set_row(y, *mask as u128);
        }
        let full_rows = rows.iter().filter(|m| **m as u128 == full).count();
        let cells_before = board.occupied_cells();

        let mut colors = ColorBuffer::new(width, 8);
        let cleared = board.clear_completed_rows(&mut colors, 0..8);

        prop_assert_eq!(board.rows().len(), 8);
        prop_assert_eq!(cleared.len(), full_rows);
        prop_assert!((0..8).all(|y| !board.is_row_full(y)));
        prop_assert_eq!(
            board.occupied_cells(),
            cells_before - width as u32 * cleared.len() as u32
        );
    }
}
