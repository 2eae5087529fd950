//! Color buffer - the render-facing view of the grid
//!
//! A flat, row-major list of `width * height` colors, top row first. It shows locked
//! cells and every falling piece; a cell is non-black iff it is occupied on the landed
//! board or covered by a falling piece.

use crate::piece::Piece;
use crate::types::Rgb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBuffer {
    width: u16,
    height: u16,
    cells: Vec<Rgb>,
}

impl ColorBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Rgb::BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Flat row-major cells, ready for a display sink.
    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, color: Rgb) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = color;
        }
    }

    /// Paint the piece footprint with its kind color.
    pub fn paint(&mut self, piece: &Piece) {
        let color = piece.color();
        for (x, y) in piece.cells() {
            self.set(x, y, color);
        }
    }

    /// Blank the piece footprint.
    pub fn erase(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            self.set(x, y, Rgb::BLACK);
        }
    }

    /// Drop row `y`, shift the rows above it down and blank the top row.
    pub fn remove_row(&mut self, y: usize) {
        if y >= self.height as usize {
            return;
        }
        let width = self.width as usize;
        self.cells.copy_within(0..y * width, width);
        self.cells[..width].fill(Rgb::BLACK);
    }

    /// Count of non-black cells.
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_black()).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(Rgb::BLACK);
    }
}
