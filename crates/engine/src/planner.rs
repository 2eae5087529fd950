//! Goal planners: where the heuristic search runs.
//!
//! The simulation emits [`PlannerMessage`]s and accepts [`GoalAssignment`]s; a
//! [`GoalPlanner`] sits in between. [`InlinePlanner`] answers on the calling thread, which
//! keeps headless runs deterministic. [`PlannerWorker`] moves the search to a background
//! thread connected by tokio mpsc channels so a slow search never stalls a tick.

use std::collections::VecDeque;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc;

use crate::core::{GoalAssignment, Planner, PlannerMessage};

/// Receives planner work and hands back goals.
pub trait GoalPlanner {
    /// Queue one message. Never blocks.
    fn submit(&mut self, message: PlannerMessage) -> Result<()>;

    /// Next finished assignment, if any. Never blocks.
    fn poll(&mut self) -> Option<GoalAssignment>;
}

impl<P: GoalPlanner + ?Sized> GoalPlanner for Box<P> {
    fn submit(&mut self, message: PlannerMessage) -> Result<()> {
        (**self).submit(message)
    }

    fn poll(&mut self) -> Option<GoalAssignment> {
        (**self).poll()
    }
}

/// Runs the search synchronously inside `submit`.
#[derive(Debug)]
pub struct InlinePlanner {
    planner: Planner,
    ready: VecDeque<GoalAssignment>,
}

impl InlinePlanner {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner,
            ready: VecDeque::new(),
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }
}

impl GoalPlanner for InlinePlanner {
    fn submit(&mut self, message: PlannerMessage) -> Result<()> {
        if let Some(assignment) = self.planner.handle(message) {
            self.ready.push_back(assignment);
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<GoalAssignment> {
        self.ready.pop_front()
    }
}

/// Default capacity of the goal channel.
pub const GOAL_CHANNEL_CAPACITY: usize = 64;

/// Background search worker.
///
/// Requests travel over an unbounded channel so the tick loop never waits; finished goals
/// come back over a bounded one. The worker is the only writer of the decided board and
/// exits when the request sender is dropped.
pub struct PlannerWorker {
    requests: Option<mpsc::UnboundedSender<PlannerMessage>>,
    goals: mpsc::Receiver<GoalAssignment>,
    handle: Option<JoinHandle<()>>,
}

impl PlannerWorker {
    pub fn spawn(planner: Planner) -> Result<Self> {
        Self::with_capacity(planner, GOAL_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(mut planner: Planner, capacity: usize) -> Result<Self> {
        let (req_tx, mut req_rx) = mpsc::unbounded_channel::<PlannerMessage>();
        let (goal_tx, goal_rx) = mpsc::channel::<GoalAssignment>(capacity.max(1));

        let handle = std::thread::Builder::new()
            .name("planner".to_string())
            .spawn(move || {
                while let Some(message) = req_rx.blocking_recv() {
                    let Some(assignment) = planner.handle(message) else {
                        continue;
                    };
                    log::debug!(
                        "planned piece {:?} (lane {}): {:?}",
                        assignment.piece_id,
                        assignment.lane,
                        assignment.goal
                    );
                    if goal_tx.blocking_send(assignment).is_err() {
                        break;
                    }
                }
                log::debug!("planner worker stopped");
            })
            .context("failed to spawn planner thread")?;

        Ok(Self {
            requests: Some(req_tx),
            goals: goal_rx,
            handle: Some(handle),
        })
    }

    /// Whether the worker thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the next assignment (used by tests and shutdown paths).
    pub fn recv_blocking(&mut self) -> Option<GoalAssignment> {
        self.goals.blocking_recv()
    }
}

impl GoalPlanner for PlannerWorker {
    fn submit(&mut self, message: PlannerMessage) -> Result<()> {
        let requests = self
            .requests
            .as_ref()
            .ok_or_else(|| anyhow!("planner worker already shut down"))?;
        requests
            .send(message)
            .map_err(|_| anyhow!("planner worker stopped unexpectedly"))
    }

    fn poll(&mut self) -> Option<GoalAssignment> {
        self.goals.try_recv().ok()
    }
}

impl Drop for PlannerWorker {
    fn drop(&mut self) {
        // Closing both ends lets a worker blocked on a full goal channel exit too.
        self.requests.take();
        self.goals.close();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("planner worker panicked");
            }
        }
    }
}
