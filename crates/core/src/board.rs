//! Board module - bit-packed occupancy grid
//!
//! The board is `height` rows of [`Row`] bit masks, row 0 at the top. Bit `c` of row `r` is
//! set iff cell `(r, c)` holds a locked mino. A row equal to [`Board::full_row`] is complete.
//!
//! Collision and merge work on whole rows with one shift and one AND/OR per piece row.
//! Neither checks the board edges: callers validate the bounding box first.

use std::ops::Range;

use crate::colors::ColorBuffer;
use crate::piece::Piece;
use crate::types::Row;

/// Row indices removed by one line-clear pass, in the order they were cleared.
pub type ClearedRows = Vec<usize>;

/// The game board - `width` columns x `height` rows of bit masks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Row>,
    width: u16,
    full_row: Row,
}

impl Board {
    /// Create a new empty board
    ///
    /// `width` must not exceed the bit width of [`Row`].
    pub fn new(width: u16, height: u16) -> Self {
        debug_assert!(width as u32 <= Row::BITS);
        let full_row = if width as u32 >= Row::BITS {
            Row::MAX
        } else {
            (1 << width) - 1
        };
        Self {
            rows: vec![0; height as usize],
            width,
            full_row,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    /// Mask of a completely filled row.
    pub fn full_row(&self) -> Row {
        self.full_row
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row mask, or `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<Row> {
        self.rows.get(y).copied()
    }

    /// Set or clear a single cell. Returns false if out of bounds.
    pub fn set(&mut self, x: u16, y: u16, occupied: bool) -> bool {
        if x >= self.width {
            return false;
        }
        match self.rows.get_mut(y as usize) {
            Some(row) => {
                if occupied {
                    *row |= 1 << x;
                } else {
                    *row &= !(1 << x);
                }
                true
            }
            None => false,
        }
    }

    /// Overwrite a whole row (masked to the board width).
    pub fn set_row(&mut self, y: usize, mask: Row) -> bool {
        match self.rows.get_mut(y) {
            Some(row) => {
                *row = mask & self.full_row;
                true
            }
            None => false,
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y) == Some(self.full_row)
    }

    /// Check whether any mino of `piece` overlaps a locked cell.
    ///
    /// Pure: repeated calls without mutation give the same answer. A piece row below the
    /// bottom edge counts as a collision so a bad caller cannot index past the grid.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece
            .rows()
            .any(|(y, mask)| self.row(y).map_or(true, |row| row & mask != 0))
    }

    /// OR the piece footprint into the board.
    ///
    /// Call exactly once per locked piece.
    pub fn merge(&mut self, piece: &Piece) {
        for (y, mask) in piece.rows() {
            if let Some(row) = self.rows.get_mut(y) {
                *row |= mask;
            }
        }
    }

    /// Remove row `y` and shift every row above it down by one, inserting an empty top row.
    pub fn remove_row(&mut self, y: usize) {
        if y >= self.rows.len() {
            return;
        }
        self.rows.copy_within(0..y, 1);
        self.rows[0] = 0;
    }

    /// Clear every full row inside `span`, keeping `colors` in step.
    ///
    /// Rows are examined top to bottom. Removing a row only moves rows above it, so the rows
    /// still to be examined keep their index and each clear applies to the already-shifted
    /// board. The row count never changes.
    pub fn clear_completed_rows(
        &mut self,
        colors: &mut ColorBuffer,
        span: Range<usize>,
    ) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let end = span.end.min(self.rows.len());
        for y in span.start..end {
            if self.is_row_full(y) {
                self.remove_row(y);
                colors.remove_row(y);
                cleared.push(y);
            }
        }
        cleared
    }

    /// Height of column `x` measured from the bottom (0 when empty).
    pub fn column_height(&self, x: u16) -> u16 {
        let bit: Row = 1 << x;
        self.rows
            .iter()
            .position(|row| row & bit != 0)
            .map_or(0, |top| self.height() - top as u16)
    }

    /// Number of locked cells.
    pub fn occupied_cells(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| *row == 0)
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.rows.fill(0);
    }

    /// Build a board from text rows, `#` occupied and anything else empty (for tests).
    ///
    /// The text rows fill the bottom of the board.
    pub fn from_ascii(width: u16, height: u16, lines: &[&str]) -> Self {
        let mut board = Self::new(width, height);
        let offset = height as usize - lines.len().min(height as usize);
        for (i, line) in lines.iter().enumerate().take(height as usize) {
            for (x, ch) in line.chars().enumerate().take(width as usize) {
                if ch == '#' {
                    board.set(x as u16, (offset + i) as u16, true);
                }
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceId;
    use crate::types::PieceKind;

    #[test]
    fn full_row_mask_matches_width() {
        assert_eq!(Board::new(10, 20).full_row(), 0b11_1111_1111);
        assert_eq!(Board::new(96, 64).full_row().count_ones(), 96);
        assert_eq!(Board::new(128, 4).full_row(), Row::MAX);
    }

    #[test]
    fn collides_and_merge_use_shifted_masks() {
        let mut board = Board::new(10, 20);
        let mut piece = Piece::new(PieceId(1), PieceKind::O, 0, 4, 0);
        piece.ypos = 18;
        assert!(!board.collides(&piece));

        board.merge(&piece);
        assert_eq!(board.row(18), Some(0b11 << 4));
        assert_eq!(board.row(19), Some(0b11 << 4));
        assert!(board.collides(&piece));
    }

    #[test]
    fn piece_below_floor_collides() {
        let board = Board::new(10, 4);
        let mut piece = Piece::new(PieceId(1), PieceKind::O, 0, 0, 0);
        piece.ypos = 3;
        assert!(board.collides(&piece));
    }

    #[test]
    fn remove_row_shifts_rows_above() {
        let mut board = Board::from_ascii(4, 4, &["#...", ".#..", "..#.", "...#"]);
        board.remove_row(2);
        assert_eq!(board.rows(), &[0, 0b0001, 0b0010, 0b1000]);
    }

    #[test]
    fn column_height_counts_from_bottom() {
        let board = Board::from_ascii(4, 6, &["#...", "....", ".#.."]);
        assert_eq!(board.column_height(0), 3);
        assert_eq!(board.column_height(1), 1);
        assert_eq!(board.column_height(2), 0);
    }

    #[test]
    fn clear_completed_rows_only_checks_span() {
        let mut board = Board::from_ascii(4, 6, &["####", "#...", "####"]);
        let mut colors = ColorBuffer::new(4, 6);

        let cleared = board.clear_completed_rows(&mut colors, 4..6);
        assert_eq!(cleared.as_slice(), &[5]);
        // Row 3 (full) was outside the span and moved down to row 4.
        assert!(board.is_row_full(4));
        assert_eq!(board.row(5), Some(0b0001));
    }

    #[test]
    fn clear_completed_rows_removes_every_full_row_in_span() {
        let mut board = Board::from_ascii(
            4,
            8,
            &["####", "####", "#...", "####", "####", "####", "####"],
        );
        let mut colors = ColorBuffer::new(4, 8);

        let cleared = board.clear_completed_rows(&mut colors, 0..8);
        assert_eq!(cleared.len(), 6);
        assert!((0..8).all(|y| !board.is_row_full(y)));
        assert_eq!(board, Board::from_ascii(4, 8, &["#..."]));
    }
}
