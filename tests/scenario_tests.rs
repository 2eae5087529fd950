//! End-to-end scenarios on a classic 10x20 grid.

use tetris_wall::core::{
    best_placement, Board, HeuristicWeights, Piece, PieceId, PlanRequest, Playfield,
};
use tetris_wall::types::PieceKind;

#[test]
fn test_o_pieces_stack_without_clearing() {
    let mut field = Playfield::new(10, 20);
    for id in 0..5 {
        let mut piece = Piece::spawn(PieceId(id), PieceKind::O, 0, 0, 10, 0);
        assert!(!field.board.collides(&piece));
        field.show(&piece);
        field.hard_drop(&mut piece);
        assert_eq!(piece.ypos, 18 - 2 * id as u16);
        let cleared = field.lock(&piece, &[]);
        assert!(cleared.is_empty());
    }
    assert_eq!(field.board.occupied_cells(), 20);
    assert_eq!(field.board.column_height(4), 10);
    assert_eq!(field.board.column_height(5), 10);
    assert_eq!(field.colors.lit_cells(), 20);
}

#[test]
fn test_vertical_i_completes_a_row() {
    let mut field = Playfield::new(10, 20);
    field.board = Board::from_ascii(10, 20, &["#########."]);
    let mut piece = Piece::new(PieceId(1), PieceKind::I, 0, 9, 0);
    piece.set_rotation(1);
    field.hard_drop(&mut piece);
    assert_eq!(piece.ypos, 16);

    let cleared = field.lock(&piece, &[]);
    assert_eq!(cleared.len(), 1);
    assert_eq!(field.board.occupied_cells(), 3);
    assert_eq!(field.board.column_height(9), 3);
    assert_eq!(field.board.rows().len(), 20);
}

#[test]
fn test_spawn_collides_when_top_rows_filled() {
    let mut board = Board::new(10, 20);
    board.set_row(0, board.full_row());
    board.set_row(1, board.full_row());
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(PieceId(1), kind, 0, 0, 10, 0);
        assert!(board.collides(&piece), "{:?}", kind);
    }
}

#[test]
fn test_search_keeps_o_at_home_column() {
    let request = PlanRequest {
        piece_id: PieceId(1),
        kind: PieceKind::O,
        lane: 0,
        home_x: 4,
        lane_columns: 0..10,
        search_columns: 0..10,
    };
    let best = best_placement(&Board::new(10, 20), &request, &HeuristicWeights::default())
        .expect("empty board has room");
    assert_eq!((best.xpos, best.ypos, best.rotation), (4, 18, 0));
}

#[test]
fn test_search_fills_the_gap() {
    let decided = Board::from_ascii(10, 20, &["#########."]);
    let request = PlanRequest {
        piece_id: PieceId(1),
        kind: PieceKind::I,
        lane: 0,
        home_x: 3,
        lane_columns: 0..10,
        search_columns: 0..10,
    };
    let best = best_placement(&decided, &request, &HeuristicWeights::default())
        .expect("room left");
    assert_eq!((best.xpos, best.rotation), (9, 1));
}
