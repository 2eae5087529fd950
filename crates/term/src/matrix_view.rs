//! Folds the color buffer into half-block color pairs.
//!
//! Each terminal cell shows two grid rows: the upper one as the foreground of `▀` and the
//! lower one as the background. A 96x64 grid therefore needs 96x32 terminal cells, which
//! keeps the cells roughly square.

use crate::core::ColorBuffer;
use crate::types::Rgb;

/// Glyph drawn in every grid cell.
pub const UPPER_HALF: char = '▀';

/// Footer shown under the grid.
pub const HINT: &str = "arrows/hjkl move  up rotate  space drop  r restart  q quit";

/// Colors of the two grid rows behind one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPair {
    pub upper: Rgb,
    pub lower: Rgb,
}

/// One screenful of color pairs, row-major, plus an optional footer line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HalfBlockFrame {
    columns: u16,
    rows: u16,
    pairs: Vec<ColorPair>,
    footer: Option<&'static str>,
}

impl HalfBlockFrame {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            pairs: vec![ColorPair::default(); columns as usize * rows as usize],
            footer: None,
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn footer(&self) -> Option<&'static str> {
        self.footer
    }

    pub fn same_size(&self, other: &HalfBlockFrame) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }

    pub fn get(&self, column: u16, row: u16) -> Option<ColorPair> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(self.pairs[row as usize * self.columns as usize + column as usize])
    }

    /// Pairs of one terminal row; empty past the bottom.
    pub fn row(&self, row: u16) -> &[ColorPair] {
        if row >= self.rows {
            return &[];
        }
        let start = row as usize * self.columns as usize;
        &self.pairs[start..start + self.columns as usize]
    }
}

#[derive(Debug, Clone)]
pub struct MatrixView {
    show_hint: bool,
}

impl Default for MatrixView {
    fn default() -> Self {
        Self { show_hint: true }
    }
}

impl MatrixView {
    pub fn new(show_hint: bool) -> Self {
        Self { show_hint }
    }

    /// Terminal cells needed to show a grid of this size.
    pub fn required_size(&self, width: u16, height: u16) -> (u16, u16) {
        let rows = height.div_ceil(2) + u16::from(self.show_hint);
        (width, rows)
    }

    /// Fold `colors` into `frame`, clipped to a terminal of `term` columns and rows.
    ///
    /// The footer is only set when a spare row is left under the grid.
    pub fn render_into(
        &self,
        colors: &ColorBuffer,
        term: (u16, u16),
        frame: &mut HalfBlockFrame,
    ) {
        let grid_rows = colors.height().div_ceil(2);
        let columns = colors.width().min(term.0);
        let rows = grid_rows.min(term.1);

        frame.columns = columns;
        frame.rows = rows;
        frame.pairs.clear();
        for ty in 0..rows {
            let upper = ty * 2;
            frame.pairs.extend((0..columns).map(|x| ColorPair {
                upper: colors.get(x, upper).unwrap_or(Rgb::BLACK),
                // Odd heights leave the last lower half off the grid.
                lower: colors.get(x, upper + 1).unwrap_or(Rgb::BLACK),
            }));
        }
        frame.footer = (self.show_hint && grid_rows < term.1).then_some(HINT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOMY: (u16, u16) = (u16::MAX, u16::MAX);

    #[test]
    fn two_grid_rows_share_one_terminal_row() {
        let mut colors = ColorBuffer::new(2, 4);
        let cyan = Rgb::new(0, 120, 120);
        let red = Rgb::new(120, 0, 0);
        colors.set(0, 2, cyan);
        colors.set(0, 3, red);

        let view = MatrixView::new(false);
        let mut frame = HalfBlockFrame::default();
        view.render_into(&colors, ROOMY, &mut frame);

        assert_eq!((frame.columns(), frame.rows()), (2, 2));
        assert_eq!(view.required_size(2, 4), (2, 2));
        assert_eq!(
            frame.get(0, 1),
            Some(ColorPair {
                upper: cyan,
                lower: red
            })
        );
        assert_eq!(frame.get(1, 1), Some(ColorPair::default()));
        assert_eq!(frame.footer(), None);
    }

    #[test]
    fn odd_height_leaves_bottom_half_black() {
        let mut colors = ColorBuffer::new(1, 3);
        colors.set(0, 2, Rgb::new(120, 120, 0));
        let mut frame = HalfBlockFrame::default();
        MatrixView::new(false).render_into(&colors, ROOMY, &mut frame);
        let pair = frame.get(0, 1).unwrap();
        assert_eq!(pair.upper, Rgb::new(120, 120, 0));
        assert_eq!(pair.lower, Rgb::BLACK);
    }

    #[test]
    fn small_terminal_clips_grid_and_drops_footer() {
        let colors = ColorBuffer::new(96, 64);
        let mut frame = HalfBlockFrame::default();
        MatrixView::default().render_into(&colors, (40, 10), &mut frame);
        assert_eq!((frame.columns(), frame.rows()), (40, 10));
        assert_eq!(frame.row(9).len(), 40);
        assert!(frame.row(10).is_empty());
        assert_eq!(frame.footer(), None);
    }

    #[test]
    fn hint_goes_under_the_grid() {
        let colors = ColorBuffer::new(80, 4);
        let view = MatrixView::default();
        let (w, h) = view.required_size(80, 4);
        let mut frame = HalfBlockFrame::default();
        view.render_into(&colors, (w, h), &mut frame);
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.footer(), Some(HINT));
    }

    #[test]
    fn rerender_after_shrink_drops_stale_pairs() {
        let mut frame = HalfBlockFrame::default();
        let view = MatrixView::new(false);
        view.render_into(&ColorBuffer::new(8, 8), ROOMY, &mut frame);
        view.render_into(&ColorBuffer::new(8, 8), (3, 2), &mut frame);
        assert_eq!(frame, HalfBlockFrame::new(3, 2));
    }
}
