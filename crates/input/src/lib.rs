//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and runs the blocking
//! terminal reader on a background thread.

pub mod map;
pub mod poller;

pub use tetris_wall_types as types;

pub use map::handle_key_event;
pub use poller::{spawn_input_thread, INPUT_CHANNEL_CAPACITY, POLL_TIMEOUT};
