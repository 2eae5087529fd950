//! Falling piece instance
//!
//! Mutable position, rotation and timing for one piece while it falls. A piece is created
//! when its lane's queue is popped and is dropped the moment it locks into the board.

use crate::pieces::{get_shape, PieceShape};
use crate::types::{PieceKind, Rgb, Row};

/// Unique id of a spawned piece within one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u64);

/// Autoplay destination: left edge column and rotation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Goal {
    pub xpos: u16,
    pub rotation: usize,
}

/// Active falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub rotation: usize,
    /// Left edge of the bounding box.
    pub xpos: u16,
    /// Top edge of the bounding box.
    pub ypos: u16,
    /// Bounding box of the current rotation.
    pub width: u8,
    pub height: u8,
    /// Lane that spawned this piece.
    pub lane: usize,
    /// Autoplay target, `None` until the search assigns one.
    pub goal: Option<Goal>,
    /// Simulation time of the last successful one-row descent (or of the spawn).
    pub last_drop_ms: u64,
}

impl Piece {
    /// Create a piece at row 0 with its left edge at `xpos`.
    pub fn new(id: PieceId, kind: PieceKind, lane: usize, xpos: u16, now_ms: u64) -> Self {
        let shape = get_shape(kind);
        Self {
            id,
            kind,
            rotation: 0,
            xpos,
            ypos: 0,
            width: shape.width,
            height: shape.height,
            lane,
            goal: None,
            last_drop_ms: now_ms,
        }
    }

    /// Create a piece centered in the lane `[lane_left, lane_left + lane_width)`.
    pub fn spawn(
        id: PieceId,
        kind: PieceKind,
        lane: usize,
        lane_left: u16,
        lane_width: u16,
        now_ms: u64,
    ) -> Self {
        let xpos = get_shape(kind).spawn_x(lane_left, lane_width);
        Self::new(id, kind, lane, xpos, now_ms)
    }

    pub fn shape(&self) -> &'static PieceShape {
        get_shape(self.kind)
    }

    pub fn color(&self) -> Rgb {
        self.shape().color
    }

    pub fn rotation_count(&self) -> usize {
        self.shape().rotation_count()
    }

    /// Row masks of the current rotation, unshifted.
    pub fn pattern(&self) -> &'static [u8] {
        self.shape().pattern(self.rotation)
    }

    /// Non-empty rows of the current footprint as `(board_row, shifted_mask)`.
    pub fn rows(&self) -> impl Iterator<Item = (usize, Row)> + '_ {
        let ypos = self.ypos as usize;
        let xpos = self.xpos as u32;
        self.pattern()
            .iter()
            .enumerate()
            .filter(|(_, mask)| **mask != 0)
            .map(move |(dy, mask)| (ypos + dy, (*mask as Row) << xpos))
    }

    /// Every occupied cell as `(column, row)`.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        let (xpos, ypos, width) = (self.xpos, self.ypos, self.width);
        self.pattern()
            .iter()
            .enumerate()
            .flat_map(move |(dy, mask)| {
                (0..width as u16)
                    .filter(move |dx| mask & (1 << dx) != 0)
                    .map(move |dx| (xpos + dx, ypos + dy as u16))
            })
    }

    /// Rows spanned by the bounding box.
    pub fn row_span(&self) -> std::ops::Range<usize> {
        self.ypos as usize..self.ypos as usize + self.height as usize
    }

    /// Advance one rotation step and swap the bounding box.
    pub(crate) fn step_rotation(&mut self) {
        self.rotation = (self.rotation + 1) % self.rotation_count();
        std::mem::swap(&mut self.width, &mut self.height);
    }

    /// Undo [`Piece::step_rotation`].
    pub(crate) fn unstep_rotation(&mut self) {
        let count = self.rotation_count();
        self.rotation = (self.rotation + count - 1) % count;
        std::mem::swap(&mut self.width, &mut self.height);
    }

    /// Jump straight to a rotation index, keeping the bounding box consistent.
    pub fn set_rotation(&mut self, rotation: usize) {
        let shape = self.shape();
        self.rotation = rotation % shape.rotation_count();
        let (width, height) = shape.dimensions(self.rotation);
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_piece_starts_at_top_of_lane() {
        let piece = Piece::spawn(PieceId(1), PieceKind::O, 2, 32, 16, 0);
        assert_eq!(piece.ypos, 0);
        assert_eq!(piece.xpos, 39);
        assert_eq!((piece.width, piece.height), (2, 2));
        assert!(piece.goal.is_none());
    }

    #[test]
    fn rows_are_shifted_by_xpos() {
        let mut piece = Piece::new(PieceId(1), PieceKind::T, 0, 5, 0);
        piece.ypos = 3;
        let rows: Vec<_> = piece.rows().collect();
        assert_eq!(rows, vec![(3, 0b010 << 5), (4, 0b111 << 5)]);
    }

    #[test]
    fn cells_match_pattern() {
        let piece = Piece::new(PieceId(1), PieceKind::S, 0, 1, 0);
        let mut cells: Vec<_> = piece.cells().collect();
        cells.sort();
        // 0b011 -> columns 0,1 ; 0b110 -> columns 1,2
        assert_eq!(cells, vec![(1, 0), (2, 0), (2, 1), (3, 1)]);
    }

    #[test]
    fn step_rotation_cycles_back() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(PieceId(1), kind, 0, 0, 0);
            let start = (piece.rotation, piece.width, piece.height);
            for _ in 0..piece.rotation_count() {
                piece.step_rotation();
            }
            assert_eq!((piece.rotation, piece.width, piece.height), start, "{:?}", kind);
        }
    }

    #[test]
    fn unstep_reverts_step() {
        let mut piece = Piece::new(PieceId(1), PieceKind::L, 0, 0, 0);
        piece.step_rotation();
        assert_eq!((piece.rotation, piece.width, piece.height), (1, 2, 3));
        piece.unstep_rotation();
        assert_eq!((piece.rotation, piece.width, piece.height), (0, 3, 2));
    }

    #[test]
    fn set_rotation_uses_dimensions_table() {
        let mut piece = Piece::new(PieceId(1), PieceKind::I, 0, 0, 0);
        piece.set_rotation(1);
        assert_eq!((piece.width, piece.height), (1, 4));
        piece.set_rotation(2);
        assert_eq!((piece.rotation, piece.width, piece.height), (0, 4, 1));
    }
}
