//! Terminal front end for the LED wall simulation.
//!
//! The grid is folded into half-block color pairs and flushed with crossterm, writing only
//! the cells that changed since the previous frame.

pub mod matrix_view;
pub mod renderer;
pub mod sink;

pub use tetris_wall_core as core;
pub use tetris_wall_engine as engine;
pub use tetris_wall_types as types;

pub use matrix_view::{ColorPair, HalfBlockFrame, MatrixView};
pub use renderer::TerminalRenderer;
pub use sink::TerminalSink;
