//! Pieces module - immutable tetromino geometry
//!
//! Every kind carries a precomputed, cyclic list of rotation patterns. A pattern is one
//! bit mask per row the shape occupies, bit `c` set iff the shape covers local column `c`.
//! Rotating advances to the next pattern and swaps the bounding box; no matrix rotation
//! and no wall kicks.

use crate::types::{PieceKind, Rgb};

/// Static description of one piece kind.
#[derive(Debug, PartialEq, Eq)]
pub struct PieceShape {
    pub kind: PieceKind,
    /// Rotation patterns in rotation order.
    pub patterns: &'static [&'static [u8]],
    /// Bounding box width at rotation 0.
    pub width: u8,
    /// Bounding box height at rotation 0.
    pub height: u8,
    pub color: Rgb,
}

impl PieceShape {
    /// Number of distinct rotation states.
    pub fn rotation_count(&self) -> usize {
        self.patterns.len()
    }

    /// Row masks for a rotation index (wraps around).
    pub fn pattern(&self, rotation: usize) -> &'static [u8] {
        self.patterns[rotation % self.patterns.len()]
    }

    /// Bounding box `(width, height)` for a rotation index.
    ///
    /// Odd rotations are a quarter turn away from rotation 0, so the box is swapped.
    pub fn dimensions(&self, rotation: usize) -> (u8, u8) {
        if rotation % 2 == 1 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Left edge that centers this shape inside a lane.
    pub fn spawn_x(&self, lane_left: u16, lane_width: u16) -> u16 {
        lane_left + lane_width.saturating_sub(self.width as u16) / 2
    }
}

static I_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::I,
    patterns: &[&[0b1111], &[0b1, 0b1, 0b1, 0b1]],
    width: 4,
    height: 1,
    color: Rgb::new(0, 120, 120),
};

static J_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::J,
    patterns: &[
        &[0b100, 0b111],
        &[0b11, 0b10, 0b10],
        &[0b111, 0b001],
        &[0b01, 0b01, 0b11],
    ],
    width: 3,
    height: 2,
    color: Rgb::new(0, 0, 120),
};

static L_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::L,
    patterns: &[
        &[0b001, 0b111],
        &[0b10, 0b10, 0b11],
        &[0b111, 0b100],
        &[0b11, 0b01, 0b01],
    ],
    width: 3,
    height: 2,
    color: Rgb::new(120, 80, 0),
};

static O_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::O,
    patterns: &[&[0b11, 0b11]],
    width: 2,
    height: 2,
    color: Rgb::new(120, 120, 0),
};

static S_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::S,
    patterns: &[&[0b011, 0b110], &[0b10, 0b11, 0b01]],
    width: 3,
    height: 2,
    color: Rgb::new(0, 120, 0),
};

static T_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::T,
    patterns: &[
        &[0b010, 0b111],
        &[0b10, 0b11, 0b10],
        &[0b111, 0b010],
        &[0b01, 0b11, 0b01],
    ],
    width: 3,
    height: 2,
    color: Rgb::new(80, 0, 120),
};

static Z_SHAPE: PieceShape = PieceShape {
    kind: PieceKind::Z,
    patterns: &[&[0b110, 0b011], &[0b01, 0b11, 0b10]],
    width: 3,
    height: 2,
    color: Rgb::new(120, 0, 0),
};

/// Catalogue indexed by [`PieceKind::index`].
static SHAPES: [&PieceShape; 7] = [
    &I_SHAPE, &J_SHAPE, &L_SHAPE, &O_SHAPE, &S_SHAPE, &T_SHAPE, &Z_SHAPE,
];

/// Get the immutable shape descriptor for a piece kind
pub fn get_shape(kind: PieceKind) -> &'static PieceShape {
    SHAPES[kind.index()]
}
