//! Movement controller - validated moves against the landed board
//!
//! Every move is speculative: edges are checked first, then the piece is shifted, tested
//! with [`Board::collides`] and reverted on collision. A successful move repaints the
//! piece in the color buffer and marks the playfield dirty so the next frame is
//! presented. Rejected moves leave no trace and report `false`.

use crate::board::{Board, ClearedRows};
use crate::colors::ColorBuffer;
use crate::piece::Piece;

/// Landed board plus its color view.
#[derive(Debug, Clone, PartialEq)]
pub struct Playfield {
    pub board: Board,
    pub colors: ColorBuffer,
    dirty: bool,
}

impl Playfield {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            board: Board::new(width, height),
            colors: ColorBuffer::new(width, height),
            dirty: true,
        }
    }

    pub fn width(&self) -> u16 {
        self.board.width()
    }

    pub fn height(&self) -> u16 {
        self.board.height()
    }

    /// Whether a visible cell changed since the last call. Resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Move piece one column left
    pub fn try_move_left(&mut self, piece: &mut Piece) -> bool {
        if piece.xpos == 0 {
            return false;
        }
        self.try_shift(piece, |p| p.xpos -= 1, |p| p.xpos += 1)
    }

    /// Move piece one column right
    pub fn try_move_right(&mut self, piece: &mut Piece) -> bool {
        if piece.xpos + piece.width as u16 + 1 > self.width() {
            return false;
        }
        self.try_shift(piece, |p| p.xpos += 1, |p| p.xpos -= 1)
    }

    /// Descend one row. Fails at the floor or on collision.
    pub fn try_drop_one_row(&mut self, piece: &mut Piece) -> bool {
        if piece.ypos + piece.height as u16 >= self.height() {
            return false;
        }
        self.try_shift(piece, |p| p.ypos += 1, |p| p.ypos -= 1)
    }

    /// Rotate to the next pattern in place (no wall kicks).
    ///
    /// The swapped bounding box must stay inside the right and bottom edges.
    pub fn try_rotate(&mut self, piece: &mut Piece) -> bool {
        if piece.xpos + piece.height as u16 > self.width() {
            return false;
        }
        if piece.ypos + piece.width as u16 > self.height() {
            return false;
        }
        self.try_shift(piece, Piece::step_rotation, Piece::unstep_rotation)
    }

    /// Descend until blocked. Returns the number of rows fallen.
    pub fn hard_drop(&mut self, piece: &mut Piece) -> u16 {
        let mut rows = 0;
        while self.try_drop_one_row(piece) {
            rows += 1;
        }
        rows
    }

    fn try_shift(
        &mut self,
        piece: &mut Piece,
        apply: impl Fn(&mut Piece),
        revert: impl Fn(&mut Piece),
    ) -> bool {
        apply(piece);
        if self.board.collides(piece) {
            revert(piece);
            return false;
        }

        revert(piece);
        self.colors.erase(piece);
        apply(piece);
        self.colors.paint(piece);
        self.dirty = true;
        true
    }

    /// Show a newly spawned piece.
    pub fn show(&mut self, piece: &Piece) {
        self.colors.paint(piece);
        self.dirty = true;
    }

    /// Lock `piece` into the board and clear the rows it completed.
    ///
    /// `falling` are the other pieces still in the air; they are lifted out of the color
    /// buffer while rows shift and repainted afterwards so only locked cells move.
    pub fn lock(&mut self, piece: &Piece, falling: &[Piece]) -> ClearedRows {
        self.board.merge(piece);
        self.colors.paint(piece);
        self.dirty = true;

        let span = piece.row_span();
        if !span.clone().any(|y| self.board.is_row_full(y)) {
            return ClearedRows::new();
        }

        for other in falling {
            self.colors.erase(other);
        }
        let cleared = self.board.clear_completed_rows(&mut self.colors, span);
        for other in falling {
            self.colors.paint(other);
        }
        cleared
    }

    /// Empty board and buffer.
    pub fn reset(&mut self) {
        self.board.clear();
        self.colors.clear();
        self.dirty = true;
    }
}
