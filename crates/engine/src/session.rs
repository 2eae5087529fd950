//! Session: one simulation wired to a planner and a render sink.
//!
//! Each [`Session::step`] exchanges planner traffic, ticks the simulation, exchanges again
//! so inline goals land before the next frame, logs what happened and presents the color
//! buffer if anything visible changed. [`Session::run_realtime`] drives steps off the wall
//! clock until the stop flag is raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::core::{GameOverCause, SimEvent, Simulation, Status};
use crate::planner::GoalPlanner;
use crate::sink::RenderSink;
use crate::types::GameAction;

pub struct Session<P, S> {
    sim: Simulation,
    planner: P,
    sink: S,
}

impl<P: GoalPlanner, S: RenderSink> Session<P, S> {
    pub fn new(sim: Simulation, planner: P, sink: S) -> Self {
        Self { sim, planner, sink }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    pub fn start(&mut self, now_ms: u64) -> Result<()> {
        log::info!(
            "starting {} lane(s) on a {}x{} grid, {} ms per row, autoplay {}",
            self.sim.config().lanes,
            self.sim.config().width,
            self.sim.config().height,
            self.sim.config().fall_ms,
            self.sim.config().autoplay
        );
        self.sim.start(now_ms);
        self.exchange()?;
        self.flush()
    }

    /// Advance one frame.
    pub fn step(&mut self, now_ms: u64) -> Result<Status> {
        self.exchange()?;
        let status = self.sim.tick(now_ms);
        self.exchange()?;
        self.flush()?;
        Ok(status)
    }

    /// Apply a discrete intent.
    ///
    /// In autoplay mode only `Abort` and `Restart` are honoured; steering belongs to the
    /// search.
    pub fn apply_action(&mut self, action: GameAction, now_ms: u64) -> Result<bool> {
        if self.sim.config().autoplay
            && !matches!(action, GameAction::Abort | GameAction::Restart)
        {
            return Ok(false);
        }
        let applied = self.sim.apply_action(action, now_ms);
        if applied && action == GameAction::Restart {
            log::info!("new game");
        }
        self.exchange()?;
        self.flush()?;
        Ok(applied)
    }

    fn exchange(&mut self) -> Result<()> {
        for message in self.sim.drain_planner_messages() {
            self.planner.submit(message)?;
        }
        while let Some(assignment) = self.planner.poll() {
            self.sim.assign_goal(assignment);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let events: Vec<SimEvent> = self.sim.drain_events().collect();
        for event in events {
            match event {
                SimEvent::Spawned { lane, id, kind } => {
                    log::debug!("lane {} spawned {} ({:?})", lane, kind.as_str(), id)
                }
                SimEvent::LinesCleared { lane, count, total } => {
                    log::debug!("lane {} cleared {} line(s), {} total", lane, count, total)
                }
                SimEvent::GameOver(cause) => {
                    let why = match cause {
                        GameOverCause::SpawnBlocked { lane } => format!("lane {} topped out", lane),
                        GameOverCause::SearchExhausted { lane } => {
                            format!("lane {} has no legal placement", lane)
                        }
                        GameOverCause::Aborted => "aborted".to_string(),
                    };
                    log::info!(
                        "game ended ({}), cleared {} lines",
                        why,
                        self.sim.lines_cleared()
                    );
                }
            }
        }
        if self.sim.take_dirty() {
            self.sink.present(self.sim.colors())?;
        }
        Ok(())
    }

    /// Step on a virtual clock until game over or `limit_ms` elapses.
    pub fn run_virtual(&mut self, limit_ms: u64) -> Result<Status> {
        let tick = self.sim.config().tick_ms.max(1) as u64;
        let mut now = 0;
        self.start(now)?;
        while now < limit_ms {
            now += tick;
            if let Status::GameOver(cause) = self.step(now)? {
                return Ok(Status::GameOver(cause));
            }
        }
        Ok(self.sim.status())
    }

    /// Step off the wall clock, feeding `inputs`, until `stop` is raised.
    ///
    /// `Abort` while a run is already over raises `stop`, so one key both ends a run and
    /// quits from the game-over screen.
    pub fn run_realtime(
        &mut self,
        stop: &AtomicBool,
        inputs: &mut mpsc::Receiver<GameAction>,
    ) -> Result<()> {
        let epoch = Instant::now();
        let now_ms = || epoch.elapsed().as_millis() as u64;
        let tick = Duration::from_millis(self.sim.config().tick_ms.max(1) as u64);

        self.start(now_ms())?;
        while !stop.load(Ordering::Relaxed) {
            let frame_start = Instant::now();

            loop {
                let action = match inputs.try_recv() {
                    Ok(action) => action,
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                };
                if action == GameAction::Abort && !self.sim.is_playing() {
                    stop.store(true, Ordering::Relaxed);
                    break;
                }
                self.apply_action(action, now_ms())?;
            }

            self.step(now_ms())?;

            if let Some(rest) = tick.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        Ok(())
    }
}
