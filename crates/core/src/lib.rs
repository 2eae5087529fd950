//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board rules, the placement search and the multi-lane simulation.
//! It has **no dependencies** on threads, terminals or clocks, which makes it:
//!
//! - **Deterministic**: the same seed and the same tick times replay the same run
//! - **Testable**: every rule is reachable from plain unit tests
//! - **Portable**: the front end decides how time passes and where pixels go
//!
//! # Module Structure
//!
//! - [`pieces`]: the seven kinds and their precomputed rotation patterns
//! - [`board`]: bit-packed occupancy grid with collision, merge and line clearing
//! - [`colors`]: the flat RGB view of the grid handed to a display sink
//! - [`piece`]: a falling piece's position, rotation, goal and fall timer
//! - [`movement`]: validated move/rotate/drop operations on the landed board
//! - [`rng`]: per-lane 7-bag queues
//! - [`search`]: heuristic placement search and the decided-board planner
//! - [`simulation`]: lane scheduling, fall timing, locking and game over
//! - [`config`]: startup configuration and heuristic weights
//!
//! # Example
//!
//! ```
//! use tetris_wall_core::{Planner, SimConfig, Simulation};
//!
//! let config = SimConfig {
//!     width: 10,
//!     height: 20,
//!     lanes: 1,
//!     seed: Some(12345),
//!     ..SimConfig::default()
//! };
//! let mut planner = Planner::new(config.width, config.height, config.weights);
//! let mut sim = Simulation::new(config).unwrap();
//! sim.start(0);
//!
//! for now in (0..10_000).step_by(5) {
//!     let messages: Vec<_> = sim.drain_planner_messages().collect();
//!     for message in messages {
//!         if let Some(assignment) = planner.handle(message) {
//!             sim.assign_goal(assignment);
//!         }
//!     }
//!     sim.tick(now);
//! }
//! assert!(sim.is_playing());
//! ```

pub mod board;
pub mod colors;
pub mod config;
pub mod movement;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod search;
pub mod simulation;

pub use tetris_wall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use colors::ColorBuffer;
pub use config::{ConfigError, DistanceMode, HeuristicWeights, SimConfig, SpeedRamp};
pub use movement::Playfield;
pub use piece::{Goal, Piece, PieceId};
pub use pieces::{get_shape, PieceShape};
pub use rng::{PieceQueue, SimpleRng};
pub use search::{
    best_placement, score_placement, GoalAssignment, Placement, PlanRequest, Planner,
    PlannerMessage,
};
pub use simulation::{GameOverCause, SimEvent, Simulation, Status, DEFAULT_SEED};
