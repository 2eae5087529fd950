//! Tetris wall (workspace facade crate).
//!
//! Re-exports the crates under `crates/` so binaries, integration tests and benches can
//! reach everything through `tetris_wall::{core,engine,input,term,types}`.

pub use tetris_wall_core as core;
pub use tetris_wall_engine as engine;
pub use tetris_wall_input as input;
pub use tetris_wall_term as term;
pub use tetris_wall_types as types;
