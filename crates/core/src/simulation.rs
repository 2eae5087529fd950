//! Simulation module - one or many lanes on a shared grid
//!
//! The simulation owns every piece of mutable game state: the landed board and its color
//! buffer, each lane's bag queue, the falling pieces, fall timing and the run status. It
//! has no clock and no threads; callers pass the current time in milliseconds to
//! [`Simulation::tick`] and forward [`PlannerMessage`]s to a planner.
//!
//! Run lifecycle: `Playing -> GameOver -> (restart) -> Playing`. A run ends the moment a
//! lane cannot place its next piece; every lane stops with it.

use std::collections::VecDeque;

use crate::config::{ConfigError, SimConfig};
use crate::movement::Playfield;
use crate::piece::{Piece, PieceId};
use crate::rng::{PieceQueue, SimpleRng};
use crate::search::{search_columns, GoalAssignment, PlanRequest, PlannerMessage};
use crate::types::{GameAction, PieceKind};
use crate::{Board, ColorBuffer};

/// Seed used when the configuration leaves it open.
pub const DEFAULT_SEED: u32 = 1;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// A freshly spawned piece overlapped the landed board.
    SpawnBlocked { lane: usize },
    /// The search found no collision-free placement.
    SearchExhausted { lane: usize },
    /// The player gave up.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver(GameOverCause),
}

/// Notable state changes, drained by the front end for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Spawned {
        lane: usize,
        id: PieceId,
        kind: PieceKind,
    },
    LinesCleared {
        lane: usize,
        count: usize,
        total: u32,
    },
    GameOver(GameOverCause),
}

#[derive(Debug, Clone)]
struct Lane {
    columns: std::ops::Range<u16>,
    queue: PieceQueue,
    /// The search found no placement for this lane's current piece; its next spawn ends
    /// the run.
    exhausted: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    field: Playfield,
    lanes: Vec<Lane>,
    falling: Vec<Piece>,
    status: Status,
    rng: SimpleRng,
    next_id: u64,
    fall_interval_ms: u32,
    lines_cleared: u32,
    /// Lanes whose first piece has been released.
    started_lanes: usize,
    last_lane_start_ms: u64,
    outbox: VecDeque<PlannerMessage>,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Create an idle simulation. Call [`Simulation::start`] to release the first piece.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SimpleRng::new(config.seed.unwrap_or(DEFAULT_SEED));
        let lanes = (0..config.lanes)
            .map(|lane| Lane {
                columns: config.lane_columns(lane),
                queue: PieceQueue::with_rng(rng.fork()),
                exhausted: false,
            })
            .collect();

        Ok(Self {
            field: Playfield::new(config.width, config.height),
            fall_interval_ms: config.fall_ms,
            config,
            lanes,
            falling: Vec::new(),
            status: Status::Playing,
            rng,
            next_id: 0,
            lines_cleared: 0,
            started_lanes: 0,
            last_lane_start_ms: 0,
            outbox: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Release the first lane's piece; the others follow at the drop spacing.
    pub fn start(&mut self, now_ms: u64) {
        if self.started_lanes > 0 || !self.is_playing() {
            return;
        }
        self.started_lanes = 1;
        self.last_lane_start_ms = now_ms;
        self.spawn(0, now_ms);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn board(&self) -> &Board {
        &self.field.board
    }

    pub fn colors(&self) -> &ColorBuffer {
        &self.field.colors
    }

    pub fn field(&self) -> &Playfield {
        &self.field
    }

    pub fn falling(&self) -> &[Piece] {
        &self.falling
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    pub fn started_lanes(&self) -> usize {
        self.started_lanes
    }

    /// Whether the color buffer changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.field.take_dirty()
    }

    /// Messages for the planner, oldest first.
    pub fn drain_planner_messages(
        &mut self,
    ) -> std::collections::vec_deque::Drain<'_, PlannerMessage> {
        self.outbox.drain(..)
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    /// Advance the simulation to `now_ms`.
    ///
    /// Staggered lane starts come first, then every falling piece steers toward its goal
    /// (one column and one rotation step at most) before its timed descent. A piece that
    /// cannot descend locks and its lane spawns the next piece.
    pub fn tick(&mut self, now_ms: u64) -> Status {
        if !self.is_playing() {
            return self.status;
        }

        if self.started_lanes > 0
            && self.started_lanes < self.lanes.len()
            && now_ms.saturating_sub(self.last_lane_start_ms) >= self.config.drop_spacing_ms()
        {
            let lane = self.started_lanes;
            self.started_lanes += 1;
            self.last_lane_start_ms = now_ms;
            if !self.spawn(lane, now_ms) {
                return self.status;
            }
        }

        let interval = self.fall_interval_ms as u64;
        let mut i = 0;
        while i < self.falling.len() {
            self.steer(i);

            let piece = &mut self.falling[i];
            if now_ms.saturating_sub(piece.last_drop_ms) > interval {
                piece.last_drop_ms = now_ms;
                if !self.field.try_drop_one_row(&mut self.falling[i]) {
                    if !self.commit_and_spawn_next(i, now_ms) {
                        return self.status;
                    }
                    // Index `i` now holds the next piece.
                    continue;
                }
            }
            i += 1;
        }

        self.status
    }

    fn steer(&mut self, i: usize) {
        let piece = &mut self.falling[i];
        let Some(goal) = piece.goal else {
            return;
        };
        if goal.xpos < piece.xpos {
            self.field.try_move_left(piece);
        } else if goal.xpos > piece.xpos {
            self.field.try_move_right(piece);
        }
        if goal.rotation != piece.rotation {
            self.field.try_rotate(piece);
        }
    }

    /// Lock the piece at `index`, clear its rows and spawn its lane's next piece.
    ///
    /// Returns false if the new piece has nowhere to go, which ends the run.
    pub fn commit_and_spawn_next(&mut self, index: usize, now_ms: u64) -> bool {
        if index >= self.falling.len() {
            return self.is_playing();
        }
        let piece = self.falling.remove(index);
        let cleared = self.field.lock(&piece, &self.falling);

        if !cleared.is_empty() {
            self.lines_cleared += cleared.len() as u32;
            if let Some(ramp) = self.config.speed_ramp {
                let step = ramp.step_ms.saturating_mul(cleared.len() as u32);
                self.fall_interval_ms = self.fall_interval_ms.saturating_sub(step).max(ramp.min_ms);
            }
            self.events.push(SimEvent::LinesCleared {
                lane: piece.lane,
                count: cleared.len(),
                total: self.lines_cleared,
            });
            if self.config.autoplay {
                self.outbox.push_back(PlannerMessage::RowsCleared(cleared));
            }
        }

        self.spawn(piece.lane, now_ms)
    }

    /// Pop the lane's queue and place the piece at the top of its lane.
    fn spawn(&mut self, lane: usize, now_ms: u64) -> bool {
        if self.lanes[lane].exhausted {
            self.game_over(GameOverCause::SearchExhausted { lane });
            return false;
        }
        let kind = self.lanes[lane].queue.draw();
        let columns = self.lanes[lane].columns.clone();
        self.next_id += 1;
        let id = PieceId(self.next_id);
        let piece = Piece::spawn(id, kind, lane, columns.start, columns.len() as u16, now_ms);

        if self.field.board.collides(&piece) {
            self.game_over(GameOverCause::SpawnBlocked { lane });
            return false;
        }

        self.field.show(&piece);
        if self.config.autoplay {
            self.outbox.push_back(PlannerMessage::Plan(PlanRequest {
                piece_id: id,
                kind,
                lane,
                home_x: piece.xpos,
                search_columns: search_columns(&columns, self.config.lane_spill, self.config.width),
                lane_columns: columns,
            }));
        }
        self.events.push(SimEvent::Spawned { lane, id, kind });
        self.falling.push(piece);
        true
    }

    fn game_over(&mut self, cause: GameOverCause) {
        if self.is_playing() {
            self.status = Status::GameOver(cause);
            self.events.push(SimEvent::GameOver(cause));
        }
    }

    /// Hand a planner result back to its piece.
    ///
    /// Results for pieces that already locked are ignored. A missing goal leaves the piece
    /// falling unsteered and ends the run when its lane next spawns.
    pub fn assign_goal(&mut self, assignment: GoalAssignment) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(piece) = self
            .falling
            .iter_mut()
            .find(|p| p.id == assignment.piece_id)
        else {
            return false;
        };
        match assignment.goal {
            Some(goal) => {
                piece.goal = Some(goal);
                true
            }
            None => {
                let lane = piece.lane;
                self.lanes[lane].exhausted = true;
                false
            }
        }
    }

    /// Apply a human intent to lane 0's falling piece.
    pub fn apply_action(&mut self, action: GameAction, now_ms: u64) -> bool {
        self.apply_lane_action(0, action, now_ms)
    }

    /// Apply a human intent to the falling piece of `lane`.
    ///
    /// `Restart` is the only intent accepted after game over.
    pub fn apply_lane_action(&mut self, lane: usize, action: GameAction, now_ms: u64) -> bool {
        match action {
            GameAction::Restart => {
                if self.is_playing() {
                    return false;
                }
                self.reset(now_ms);
                return true;
            }
            GameAction::Abort => {
                let playing = self.is_playing();
                self.game_over(GameOverCause::Aborted);
                return playing;
            }
            _ => {}
        }
        if !self.is_playing() {
            return false;
        }
        let Some(index) = self.falling.iter().position(|p| p.lane == lane) else {
            return false;
        };

        let piece = &mut self.falling[index];
        match action {
            GameAction::MoveLeft => self.field.try_move_left(piece),
            GameAction::MoveRight => self.field.try_move_right(piece),
            GameAction::Rotate => self.field.try_rotate(piece),
            GameAction::SoftDrop => {
                if self.field.try_drop_one_row(piece) {
                    true
                } else {
                    self.commit_and_spawn_next(index, now_ms);
                    true
                }
            }
            GameAction::HardDrop => {
                self.field.hard_drop(piece);
                self.commit_and_spawn_next(index, now_ms);
                true
            }
            GameAction::Abort | GameAction::Restart => false,
        }
    }

    /// Start a fresh run: empty boards, new bags, base speed, planner reset.
    pub fn reset(&mut self, now_ms: u64) {
        self.field.reset();
        self.falling.clear();
        for lane in &mut self.lanes {
            lane.queue = PieceQueue::with_rng(self.rng.fork());
            lane.exhausted = false;
        }
        self.fall_interval_ms = self.config.fall_ms;
        self.lines_cleared = 0;
        self.started_lanes = 0;
        self.status = Status::Playing;
        self.outbox.clear();
        if self.config.autoplay {
            self.outbox.push_back(PlannerMessage::Reset);
        }
        self.start(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Goal;
    use crate::search::Planner;
    use crate::types::Rgb;

    fn single_lane(autoplay: bool) -> SimConfig {
        SimConfig {
            width: 10,
            height: 20,
            lanes: 1,
            fall_ms: 100,
            autoplay,
            seed: Some(7),
            ..SimConfig::default()
        }
    }

    #[test]
    fn start_spawns_first_lane_only() {
        let mut sim = Simulation::new(SimConfig {
            seed: Some(3),
            ..SimConfig::default()
        })
        .unwrap();
        sim.start(0);
        assert_eq!(sim.falling().len(), 1);
        assert_eq!(sim.falling()[0].lane, 0);
        assert_eq!(sim.falling()[0].ypos, 0);
    }

    #[test]
    fn lanes_start_at_drop_spacing() {
        let config = SimConfig {
            seed: Some(3),
            ..SimConfig::default()
        };
        let spacing = config.drop_spacing_ms();
        let mut sim = Simulation::new(config).unwrap();
        sim.start(0);

        sim.tick(spacing - 1);
        assert_eq!(sim.started_lanes(), 1);
        sim.tick(spacing);
        assert_eq!(sim.started_lanes(), 2);
        assert!(sim.falling().iter().any(|p| p.lane == 1));
    }

    #[test]
    fn piece_falls_only_after_interval() {
        let mut sim = Simulation::new(single_lane(false)).unwrap();
        sim.start(0);
        sim.tick(100);
        assert_eq!(sim.falling()[0].ypos, 0);
        sim.tick(101);
        assert_eq!(sim.falling()[0].ypos, 1);
    }

    #[test]
    fn speed_ramp_applies_per_line() {
        let mut config = single_lane(false);
        config.speed_ramp = Some(crate::config::SpeedRamp {
            step_ms: 30,
            min_ms: 50,
        });
        let mut sim = Simulation::new(config).unwrap();
        sim.start(0);
        sim.field.board.set_row(19, 0b01_1111_1111);
        sim.field.board.set_row(18, 0b01_1111_1111);
        let id = sim.falling[0].id;
        sim.falling[0] = Piece::new(id, PieceKind::I, 0, 3, 0);

        assert!(sim.apply_action(GameAction::Rotate, 0));
        while sim.apply_action(GameAction::MoveRight, 0) {}
        assert_eq!(sim.falling[0].xpos, 9);
        sim.apply_action(GameAction::HardDrop, 0);

        assert_eq!(sim.lines_cleared(), 2);
        // 100 - 2 * 30 would be 40, floored at 50.
        assert_eq!(sim.fall_interval_ms(), 50);
        assert!(sim.is_playing());
    }

    #[test]
    fn stale_assignment_is_ignored() {
        let mut sim = Simulation::new(single_lane(true)).unwrap();
        sim.start(0);
        assert!(!sim.assign_goal(GoalAssignment {
            piece_id: PieceId(999),
            lane: 0,
            goal: None,
        }));
        assert!(sim.is_playing());
    }

    #[test]
    fn autoplay_emits_plan_and_accepts_goal() {
        let config = single_lane(true);
        let weights = config.weights;
        let mut sim = Simulation::new(config).unwrap();
        let mut planner = Planner::new(10, 20, weights);
        sim.start(0);

        let messages: Vec<_> = sim.drain_planner_messages().collect();
        assert_eq!(messages.len(), 1);
        for message in messages {
            let assignment = planner.handle(message).unwrap();
            assert!(sim.assign_goal(assignment));
        }
        assert!(sim.falling()[0].goal.is_some());
    }

    #[test]
    fn missing_goal_ends_run_at_next_spawn() {
        let mut sim = Simulation::new(single_lane(true)).unwrap();
        sim.start(0);
        let id = sim.falling()[0].id;
        assert!(!sim.assign_goal(GoalAssignment {
            piece_id: id,
            lane: 0,
            goal: None,
        }));

        // The piece keeps falling without a goal.
        assert!(sim.is_playing());
        sim.tick(101);
        assert_eq!(sim.falling()[0].ypos, 1);
        assert!(sim.falling()[0].goal.is_none());

        let mut now = 101;
        while sim.is_playing() && now < 10_000 {
            now += 101;
            sim.tick(now);
        }
        assert_eq!(
            sim.status(),
            Status::GameOver(GameOverCause::SearchExhausted { lane: 0 })
        );
        assert_eq!(sim.board().occupied_cells(), 4);
        assert!(sim.falling().is_empty());
    }

    /// Swap lane 0's falling piece for a horizontal I at `xpos`, keeping the colors in step.
    fn replace_with_i(sim: &mut Simulation, xpos: u16) {
        let old = sim.falling[0].clone();
        sim.field.colors.erase(&old);
        let piece = Piece::new(old.id, PieceKind::I, 0, xpos, 0);
        sim.field.show(&piece);
        sim.falling[0] = piece;
    }

    #[test]
    fn blocked_spawn_leaves_board_and_colors_alone() {
        let mut sim = Simulation::new(single_lane(false)).unwrap();
        sim.start(0);
        replace_with_i(&mut sim, 0);
        // Columns 4..=8 filled everywhere: the I fits below, no spawn position does.
        for y in 0..20 {
            sim.field.board.set_row(y, 0b01_1111_0000);
        }

        assert!(sim.apply_action(GameAction::HardDrop, 0));
        assert_eq!(
            sim.status(),
            Status::GameOver(GameOverCause::SpawnBlocked { lane: 0 })
        );
        assert!(sim.falling().is_empty());
        assert_eq!(sim.board().row(19), Some(0b01_1111_1111));
        assert!((0..19).all(|y| sim.board().row(y) == Some(0b01_1111_0000)));
        // Only the locked I is lit; the blocked piece never reached the buffer.
        assert_eq!(sim.colors().lit_cells(), 4);
        assert!((3..7).all(|x| sim.colors().get(x, 0) == Some(Rgb::BLACK)));
        assert!(sim
            .drain_events()
            .any(|e| e == SimEvent::GameOver(GameOverCause::SpawnBlocked { lane: 0 })));
    }

    #[test]
    fn steering_moves_before_descent_in_same_tick() {
        let mut sim = Simulation::new(single_lane(false)).unwrap();
        sim.start(0);
        replace_with_i(&mut sim, 3);
        sim.falling[0].goal = Some(Goal {
            xpos: 4,
            rotation: 0,
        });
        sim.field.board.set(7, 1, true);

        // Shifted first, the I sits on the block at (7, 1) and locks in row 0. Dropped
        // first, it would still be falling at column 3.
        sim.tick(101);
        assert_eq!(sim.board().row(0), Some(0b00_1111_0000));
        assert!(sim.falling().iter().all(|p| p.id != PieceId(1)));
    }

    #[test]
    fn rows_cleared_reach_planner_before_next_plan() {
        let mut sim = Simulation::new(single_lane(true)).unwrap();
        sim.start(0);
        assert_eq!(sim.drain_planner_messages().count(), 1);

        sim.field.board.set_row(19, 0b01_1111_1111);
        sim.field.board.set_row(18, 0b01_1111_1111);
        replace_with_i(&mut sim, 3);
        assert!(sim.apply_action(GameAction::Rotate, 0));
        while sim.apply_action(GameAction::MoveRight, 0) {}
        assert!(sim.apply_action(GameAction::HardDrop, 0));
        assert_eq!(sim.lines_cleared(), 2);

        let messages: Vec<_> = sim.drain_planner_messages().collect();
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], PlannerMessage::RowsCleared(rows) if rows.len() == 2));
        assert!(matches!(&messages[1], PlannerMessage::Plan(req) if req.lane == 0));
    }

    #[test]
    fn abort_then_restart() {
        let mut sim = Simulation::new(single_lane(false)).unwrap();
        sim.start(0);
        assert!(sim.apply_action(GameAction::Abort, 0));
        assert_eq!(sim.status(), Status::GameOver(GameOverCause::Aborted));
        assert!(!sim.apply_action(GameAction::MoveLeft, 0));

        assert!(sim.apply_action(GameAction::Restart, 10));
        assert!(sim.is_playing());
        assert_eq!(sim.falling().len(), 1);
        assert_eq!(sim.lines_cleared(), 0);
    }
}
