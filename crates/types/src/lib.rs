//! Core types module - shared data structures and constants
//!
//! This module defines the plain data used by every other crate in the workspace:
//! piece kinds, colors, input intents and the grid defaults. Nothing here depends on
//! the simulation, threads or the terminal.
//!
//! # Grid Dimensions
//!
//! The default grid matches a 3x2 chain of 32x32 LED panels:
//!
//! - **Width**: 96 columns (indexed 0-95, left to right)
//! - **Height**: 64 rows (indexed 0-63, top to bottom)
//! - **Lanes**: 6 games side by side, 16 columns each
//!
//! A board row is stored as one [`Row`] bit mask, bit `c` being column `c`, so a grid can be
//! at most [`MAX_BOARD_WIDTH`] columns wide.
//!
//! # Timing Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FALL_MS` | 300 | Time for a piece to fall one row |
//! | `DEFAULT_TICK_MS` | 5 | Simulation tick interval |
//! | `DEFAULT_SPEED_STEP_MS` | 2 | Speed ramp step per cleared line |
//! | `DEFAULT_MIN_FALL_MS` | 60 | Fastest fall interval when ramping |
//!
//! # Examples
//!
//! ```
//! use tetris_wall_types::{PieceKind, DEFAULT_BOARD_WIDTH, DEFAULT_LANES};
//!
//! assert_eq!(PieceKind::T.index(), 5);
//! assert_eq!(PieceKind::T.as_str(), "t");
//! assert_eq!(DEFAULT_BOARD_WIDTH / DEFAULT_LANES as u16, 16);
//! ```

/// One board row, bit `c` set iff column `c` is occupied.
pub type Row = u128;

/// Widest grid a [`Row`] can hold.
pub const MAX_BOARD_WIDTH: u16 = Row::BITS as u16;

/// Default grid width in cells (96 columns)
pub const DEFAULT_BOARD_WIDTH: u16 = 96;

/// Default grid height in cells (64 rows)
pub const DEFAULT_BOARD_HEIGHT: u16 = 64;

/// Default number of games running side by side
pub const DEFAULT_LANES: usize = 6;

/// Default time for a piece to fall one row, in milliseconds
pub const DEFAULT_FALL_MS: u32 = 300;

/// Default simulation tick interval, in milliseconds
pub const DEFAULT_TICK_MS: u32 = 5;

/// Default fall interval decrease per cleared line when the speed ramp is on
pub const DEFAULT_SPEED_STEP_MS: u32 = 2;

/// Default floor for the fall interval when the speed ramp is on
pub const DEFAULT_MIN_FALL_MS: u32 = 60;

/// Smallest lane width that still fits every piece in every rotation
pub const MIN_LANE_WIDTH: u16 = 4;

/// Smallest grid height that still fits every piece in every rotation
pub const MIN_BOARD_HEIGHT: u16 = 4;

/// The seven tetromino piece kinds
///
/// Declaration order is the catalogue order: `I J L O S T Z`. [`PieceKind::index`] gives
/// a kind's position in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind in catalogue order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Position in the catalogue (0..7).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }
}

/// Discrete move intents fed to the simulation.
///
/// Human input and the terminal front end both produce these; absence of input is the
/// default no-op state, so there is no `None` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Advance to the next rotation pattern (90° step)
    Rotate,
    /// Drop piece one row, locking it if it cannot fall
    SoftDrop,
    /// Drop piece until blocked and lock it
    HardDrop,
    /// End the current run
    Abort,
    /// Start a new run after game over
    Restart,
}

impl GameAction {
    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Abort => "abort",
            GameAction::Restart => "restart",
        }
    }
}
