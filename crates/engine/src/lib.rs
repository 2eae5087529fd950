//! Engine glue: planners, render sinks and the session loop.
//!
//! `tetris-wall-core` knows nothing about threads or clocks. This crate supplies both:
//! a [`PlannerWorker`] that runs the placement search off the tick thread, and a
//! [`Session`] that owns the simulation and advances it on either a virtual or a wall clock.

pub mod planner;
pub mod session;
pub mod sink;

pub use tetris_wall_core as core;
pub use tetris_wall_types as types;

pub use planner::{GoalPlanner, InlinePlanner, PlannerWorker, GOAL_CHANNEL_CAPACITY};
pub use session::Session;
pub use sink::{CaptureSink, NullSink, RenderSink};
