//! Headless runner.
//!
//! Runs the simulation on a virtual clock with the inline planner and no display, then
//! prints a summary. Useful for tuning heuristic weights:
//!
//! ```text
//! TETRIS_WALL_CONFIG=weights.json cargo run --release --bin headless -- 600000
//! ```
//!
//! The optional argument is the virtual duration in milliseconds.

use anyhow::{Context, Result};

use tetris_wall::core::{Planner, SimConfig, Simulation, Status};
use tetris_wall::engine::{InlinePlanner, NullSink, Session};

const DEFAULT_DURATION_MS: u64 = 10 * 60 * 1000;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let duration_ms = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("duration must be milliseconds, got {:?}", arg))?,
        None => DEFAULT_DURATION_MS,
    };

    let mut config = SimConfig::from_env().context("invalid configuration")?;
    // Nobody is at the keyboard.
    config.autoplay = true;

    let planner = InlinePlanner::new(Planner::new(config.width, config.height, config.weights));
    let mut session = Session::new(Simulation::new(config)?, planner, NullSink::default());
    let status = session.run_virtual(duration_ms)?;

    let sim = session.sim();
    let outcome = match status {
        Status::Playing => "still playing".to_string(),
        Status::GameOver(cause) => format!("game over ({:?})", cause),
    };
    println!(
        "{}: {} lines cleared, fall interval {} ms, {} frames presented",
        outcome,
        sim.lines_cleared(),
        sim.fall_interval_ms(),
        session.sink().frames
    );
    Ok(())
}
