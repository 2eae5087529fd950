//! Terminal runner (default binary).
//!
//! Shows the whole grid on the terminal with half-block glyphs. With autoplay on (the
//! default) every lane is steered by the background planner; with
//! `TETRIS_WALL_AUTOPLAY=0` the keyboard steers lane 0.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use tetris_wall::core::{Planner, SimConfig, Simulation, Status};
use tetris_wall::engine::{GoalPlanner, InlinePlanner, PlannerWorker, Session};
use tetris_wall::input::{spawn_input_thread, INPUT_CHANNEL_CAPACITY};
use tetris_wall::term::{MatrixView, TerminalSink};

fn main() -> Result<()> {
    // Logs go to stderr, which shares the screen; keep them quiet unless asked.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut config = SimConfig::from_env().context("invalid configuration")?;
    if config.seed.is_none() {
        config.seed = Some(clock_seed());
    }

    let planner: Box<dyn GoalPlanner> = if config.autoplay {
        Box::new(PlannerWorker::spawn(Planner::new(
            config.width,
            config.height,
            config.weights,
        ))?)
    } else {
        Box::new(InlinePlanner::new(Planner::new(
            config.width,
            config.height,
            config.weights,
        )))
    };
    let sim = Simulation::new(config)?;

    let mut sink = TerminalSink::new(MatrixView::default());
    sink.enter()?;
    let mut session = Session::new(sim, planner, sink);

    let stop = Arc::new(AtomicBool::new(false));
    let (tx, mut rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let input = spawn_input_thread(stop.clone(), tx)?;

    let result = session.run_realtime(&stop, &mut rx);

    stop.store(true, Ordering::Relaxed);
    if input.join().is_err() {
        log::warn!("input thread panicked");
    }
    let lines = session.sim().lines_cleared();
    let status = session.sim().status();
    // Restores the terminal before anything is printed.
    drop(session);
    result?;

    match status {
        Status::GameOver(cause) => println!("Game over ({:?}): cleared {} lines", cause, lines),
        Status::Playing => println!("Stopped: cleared {} lines", lines),
    }
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}
